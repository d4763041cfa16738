use crate::class::model::Link;

/// Exploration record of one class member: which mutation directions have
/// been resolved and, when link tracking is on, where each of them leads.
#[derive(Debug, Clone)]
pub struct LinkHolder {
    explored: Vec<bool>,
    remaining: usize,
    links: Option<Vec<Option<Link>>>,
}

impl LinkHolder {
    pub fn new(size: usize, track_links: bool) -> Self {
        Self {
            explored: vec![false; size],
            remaining: size,
            links: track_links.then(|| vec![None; size]),
        }
    }

    pub fn is_explored(&self, vertex: usize) -> bool {
        self.explored[vertex]
    }

    /// Mark `vertex` resolved. Returns false if it already was, in which
    /// case the stored link is left untouched.
    pub fn link(&mut self, vertex: usize, link: Link) -> bool {
        if self.explored[vertex] {
            return false;
        }
        self.explored[vertex] = true;
        self.remaining -= 1;
        if let Some(links) = self.links.as_mut() {
            links[vertex] = Some(link);
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn unexplored(&self) -> impl Iterator<Item = usize> + '_ {
        self.explored
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(vertex, _)| vertex)
    }

    pub fn links(&self) -> Option<&[Option<Link>]> {
        self.links.as_deref()
    }

    pub fn into_links(self) -> Option<Vec<Option<Link>>> {
        self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::model::MemberId;

    #[test]
    fn completes_after_every_direction() {
        let mut holder = LinkHolder::new(3, true);
        let to = |id| Link {
            target: MemberId(id),
            vertex: 0,
        };
        assert!(holder.link(1, to(4)));
        assert!(!holder.link(1, to(9)), "second link must be ignored");
        assert_eq!(holder.unexplored().collect::<Vec<_>>(), vec![0, 2]);
        assert!(holder.link(0, to(2)));
        assert!(holder.link(2, to(3)));
        assert!(holder.is_complete());
        assert_eq!(holder.remaining(), 0);
        assert_eq!(holder.links().map(|links| links[1]), Some(Some(to(4))));
    }

    #[test]
    fn untracked_holder_keeps_no_links() {
        let mut holder = LinkHolder::new(2, false);
        holder.link(0, Link { target: MemberId(1), vertex: 0 });
        assert!(holder.links().is_none());
        assert!(!holder.is_complete());
        assert!(LinkHolder::new(0, false).is_complete());
    }
}
