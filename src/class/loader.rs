use std::collections::VecDeque;
use std::ops::ControlFlow;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::class::links::LinkHolder;
use crate::class::model::{ClassItem, ClassSize, ClassState, Link, MemberId};
use crate::config::ClassConfig;
use crate::equiv::{CheckerCache, CheckerStats, MatrixSignature, RowMap};
use crate::matrix::Matrix;

/// What the loader needs from the objects it explores: mutation into a
/// caller-owned buffer, identity up to vertex relabelling, and a stop rule.
pub trait Explorable: Clone {
    fn vertex_count(&self) -> usize;

    /// A value of the same shape, used as a mutation output buffer.
    fn blank(&self) -> Self;

    fn mutate_into(&self, vertex: usize, out: &mut Self);

    /// Relabelling-invariant hash key. Equivalent values must agree.
    fn signature(&self) -> MatrixSignature;

    /// Vertex correspondence onto `other`, if the two are equivalent.
    fn row_map_onto(&self, other: &Self, checkers: &mut CheckerCache) -> Option<RowMap>;

    /// Reaching a value for which this holds ends the enumeration.
    fn should_stop(&self) -> bool;
}

impl Explorable for Matrix {
    fn vertex_count(&self) -> usize {
        self.size()
    }

    fn blank(&self) -> Self {
        Matrix::zero(self.size())
    }

    fn mutate_into(&self, vertex: usize, out: &mut Self) {
        self.mutate(vertex, out);
    }

    fn signature(&self) -> MatrixSignature {
        MatrixSignature::of(self)
    }

    fn row_map_onto(&self, other: &Self, checkers: &mut CheckerCache) -> Option<RowMap> {
        checkers.row_map(self, other)
    }

    fn should_stop(&self) -> bool {
        self.is_infinite()
    }
}

#[derive(Debug, Default, Clone)]
pub struct LoaderStats {
    pub mutations: usize,
    pub seen: usize,
    pub discovered: usize,
    pub retired: usize,
    pub peak_active: usize,
}

#[derive(Debug, Clone)]
struct Member<Q> {
    quiver: Q,
    links: Option<Vec<Option<Link>>>,
}

/// Breadth-first enumeration of a mutation class.
///
/// Every member ever discovered lives in an arena and stays reachable
/// through the signature index, so membership and size queries see the whole
/// class. Only members with unresolved directions keep a [`LinkHolder`];
/// once all of a member's directions are resolved its record is retired.
///
/// Each pull from the iterator explores one queued member and yields it. If
/// exploring it reaches an infinite-type quiver the pull yields
/// [`ClassItem::Infinite`] instead and the enumeration is over.
#[derive(Debug, Clone)]
pub struct MutationClassLoader<Q: Explorable = Matrix> {
    vertex_count: usize,
    track_links: bool,
    members: Vec<Member<Q>>,
    index: IndexMap<MatrixSignature, Vec<MemberId>>,
    active: IndexMap<MemberId, LinkHolder>,
    queue: VecDeque<MemberId>,
    probe: Q,
    checkers: CheckerCache,
    state: ClassState,
    sentinel_pending: bool,
    stats: LoaderStats,
}

impl<Q: Explorable> MutationClassLoader<Q> {
    pub fn new(seed: Q) -> Self {
        Self::with_config(seed, &ClassConfig::default())
    }

    pub fn with_config(seed: Q, config: &ClassConfig) -> Self {
        let vertex_count = seed.vertex_count();
        let mut loader = Self {
            vertex_count,
            track_links: config.track_links,
            members: Vec::new(),
            index: IndexMap::new(),
            active: IndexMap::new(),
            queue: VecDeque::new(),
            probe: seed.blank(),
            checkers: CheckerCache::new(),
            state: ClassState::Active,
            sentinel_pending: false,
            stats: LoaderStats::default(),
        };

        let stop = seed.should_stop();
        let signature = seed.signature();
        let id = loader.publish(seed, signature);
        if stop {
            debug!("Seed quiver is already infinite-type");
            loader.state = ClassState::Infinite;
            loader.sentinel_pending = true;
        } else {
            loader.queue.push_back(id);
        }
        loader
    }

    pub fn state(&self) -> ClassState {
        self.state
    }

    pub fn has_next(&self) -> bool {
        match self.state {
            ClassState::Active => !self.queue.is_empty(),
            ClassState::Infinite => self.sentinel_pending,
            ClassState::Finite => false,
        }
    }

    pub fn stats(&self) -> &LoaderStats {
        &self.stats
    }

    pub fn checker_stats(&self) -> CheckerStats {
        self.checkers.stats()
    }

    /// Number of members discovered so far, explored or not.
    pub fn discovered(&self) -> usize {
        self.members.len()
    }

    /// Members whose exploration records are still open.
    pub fn active(&self) -> usize {
        self.active.len()
    }

    pub fn member(&self, id: MemberId) -> &Q {
        &self.members[id.0].quiver
    }

    pub fn members(&self) -> impl Iterator<Item = &Q> + '_ {
        self.members.iter().map(|member| &member.quiver)
    }

    /// Run the enumeration to the end. Stops at the first infinite-type
    /// quiver rather than exhausting the frontier.
    pub fn size(&mut self) -> ClassSize {
        while let Some(item) = self.next() {
            if item.is_infinite() {
                return ClassSize::Infinite;
            }
        }
        match self.state {
            ClassState::Infinite => ClassSize::Infinite,
            _ => ClassSize::Finite(self.members.len()),
        }
    }

    /// Whether `quiver` is equivalent to a member of the class. Drives the
    /// enumeration forward until the answer is known, so for an infinite
    /// class a negative answer only covers the part explored.
    pub fn contains(&mut self, quiver: &Q) -> bool {
        if quiver.vertex_count() != self.vertex_count {
            return false;
        }
        loop {
            if self.find(quiver).is_some() {
                return true;
            }
            match self.next() {
                Some(ClassItem::Member(_)) => {}
                Some(ClassItem::Infinite) | None => return self.find(quiver).is_some(),
            }
        }
    }

    /// Already discovered member equivalent to `quiver`, without advancing.
    pub fn find(&mut self, quiver: &Q) -> Option<MemberId> {
        if quiver.vertex_count() != self.vertex_count {
            return None;
        }
        let signature = quiver.signature();
        locate(
            &self.index,
            &self.members,
            &mut self.checkers,
            quiver,
            &signature,
        )
        .map(|(id, _)| id)
    }

    pub(crate) fn into_parts(self) -> (Vec<Q>, Vec<Option<Vec<Option<Link>>>>) {
        self.members
            .into_iter()
            .map(|member| (member.quiver, member.links))
            .unzip()
    }

    fn publish(&mut self, quiver: Q, signature: MatrixSignature) -> MemberId {
        let id = MemberId(self.members.len());
        self.members.push(Member {
            quiver,
            links: None,
        });
        self.index.entry(signature).or_default().push(id);
        self.active
            .insert(id, LinkHolder::new(self.vertex_count, self.track_links));
        self.stats.discovered += 1;
        self.stats.peak_active = self.stats.peak_active.max(self.active.len());
        id
    }

    /// Resolve every open direction of `id`. Breaks as soon as a mutation
    /// produces an unseen quiver that should stop the enumeration.
    fn explore(&mut self, id: MemberId) -> ControlFlow<()> {
        let Some(mut holder) = self.active.swap_remove(&id) else {
            trace!("Member {id} was fully linked before being explored");
            return ControlFlow::Continue(());
        };

        for vertex in 0..self.vertex_count {
            if holder.is_explored(vertex) {
                continue;
            }
            self.members[id.0]
                .quiver
                .mutate_into(vertex, &mut self.probe);
            self.stats.mutations += 1;
            let signature = self.probe.signature();

            match locate(
                &self.index,
                &self.members,
                &mut self.checkers,
                &self.probe,
                &signature,
            ) {
                Some((seen, map)) => {
                    // The probe matches `seen` with vertex v sent to map[v],
                    // so `seen` mutated at map[v] gives back this member.
                    self.stats.seen += 1;
                    let back = map[vertex];
                    holder.link(
                        vertex,
                        Link {
                            target: seen,
                            vertex: back,
                        },
                    );
                    let reverse = Link { target: id, vertex };
                    if seen == id {
                        holder.link(back, reverse);
                    } else {
                        self.link_member(seen, back, reverse);
                    }
                }
                None => {
                    if self.probe.should_stop() {
                        debug!(
                            "Infinite-type quiver reached from member {id} at vertex {vertex} after {} members",
                            self.members.len()
                        );
                        self.active.insert(id, holder);
                        return ControlFlow::Break(());
                    }
                    let blank = self.probe.blank();
                    let fresh = std::mem::replace(&mut self.probe, blank);
                    let new_id = self.publish(fresh, signature);
                    trace!("Member {id} mutated at {vertex} gives new member {new_id}");
                    holder.link(
                        vertex,
                        Link {
                            target: new_id,
                            vertex,
                        },
                    );
                    self.link_member(new_id, vertex, Link { target: id, vertex });
                    self.queue.push_back(new_id);
                }
            }
        }

        self.retire(id, holder);
        ControlFlow::Continue(())
    }

    fn link_member(&mut self, id: MemberId, vertex: usize, link: Link) {
        let Some(holder) = self.active.get_mut(&id) else {
            return;
        };
        if holder.link(vertex, link) && holder.is_complete() {
            if let Some(holder) = self.active.swap_remove(&id) {
                self.retire(id, holder);
            }
        }
    }

    fn retire(&mut self, id: MemberId, holder: LinkHolder) {
        debug_assert!(holder.is_complete());
        self.members[id.0].links = holder.into_links();
        self.stats.retired += 1;
    }

    fn finish(&mut self) {
        self.state = ClassState::Finite;
        let checks = self.checkers.stats();
        debug!(
            "Mutation class exhausted: {} members, {} mutations, {} seen, peak active {}, {} equivalence searches",
            self.members.len(),
            self.stats.mutations,
            self.stats.seen,
            self.stats.peak_active,
            checks.searches
        );
    }
}

impl<Q: Explorable> Iterator for MutationClassLoader<Q> {
    type Item = ClassItem<Q>;

    fn next(&mut self) -> Option<ClassItem<Q>> {
        match self.state {
            ClassState::Finite => None,
            ClassState::Infinite => {
                if self.sentinel_pending {
                    self.sentinel_pending = false;
                    Some(ClassItem::Infinite)
                } else {
                    None
                }
            }
            ClassState::Active => {
                let Some(id) = self.queue.pop_front() else {
                    self.finish();
                    return None;
                };
                if self.explore(id).is_break() {
                    self.state = ClassState::Infinite;
                    self.queue.clear();
                    return Some(ClassItem::Infinite);
                }
                if self.queue.is_empty() {
                    self.finish();
                }
                Some(ClassItem::Member(self.members[id.0].quiver.clone()))
            }
        }
    }
}

fn locate<Q: Explorable>(
    index: &IndexMap<MatrixSignature, Vec<MemberId>>,
    members: &[Member<Q>],
    checkers: &mut CheckerCache,
    quiver: &Q,
    signature: &MatrixSignature,
) -> Option<(MemberId, RowMap)> {
    index.get(signature)?.iter().find_map(|&id| {
        quiver
            .row_map_onto(&members[id.0].quiver, checkers)
            .map(|map| (id, map))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(size: usize) -> Matrix {
        let mut m = Matrix::zero(size);
        for i in 0..size.saturating_sub(1) {
            m[(i, i + 1)] = 1;
            m[(i + 1, i)] = -1;
        }
        m
    }

    #[test]
    fn linear_chain_class_sizes() {
        let expected = [(1, 1), (2, 1), (3, 4), (4, 6), (5, 19)];
        for (size, count) in expected {
            let mut loader = MutationClassLoader::new(chain(size));
            assert_eq!(loader.size(), ClassSize::Finite(count), "A{size}");
            assert_eq!(loader.state(), ClassState::Finite);
            assert!(!loader.has_next());
        }
    }

    #[test]
    fn iteration_yields_each_member_once() {
        let mut loader = MutationClassLoader::new(chain(4));
        let first = loader.next().and_then(ClassItem::member);
        assert_eq!(first, Some(chain(4)), "seed comes first");
        let rest: Vec<Matrix> = loader.by_ref().filter_map(ClassItem::member).collect();
        assert_eq!(rest.len() + 1, 6);
        assert_eq!(loader.discovered(), 6);
        assert_eq!(loader.active(), 0);
        assert_eq!(loader.stats().retired, 6);

        let mut checkers = CheckerCache::new();
        for (i, a) in rest.iter().enumerate() {
            for b in &rest[i + 1..] {
                assert!(!checkers.are_equivalent(a, b), "{a} repeated as {b}");
            }
        }
    }

    #[test]
    fn infinite_seed_yields_only_the_sentinel() {
        let seed: Matrix = "{ {0 3} {-3 0} }".parse().expect("parse");
        let mut loader = MutationClassLoader::new(seed);
        assert_eq!(loader.state(), ClassState::Infinite);
        assert!(loader.has_next());
        assert_eq!(loader.next(), Some(ClassItem::Infinite));
        assert_eq!(loader.next(), None);
        assert_eq!(loader.size(), ClassSize::Infinite);
    }

    #[test]
    fn enumeration_stops_on_first_infinite_quiver() {
        let seed: Matrix = "{ {0 2 0} {-2 0 1} {0 -1 0} }".parse().expect("parse");
        let mut loader = MutationClassLoader::new(seed);
        let items: Vec<_> = loader.by_ref().collect();
        assert_eq!(items.last(), Some(&ClassItem::Infinite));
        assert_eq!(items.iter().filter(|item| item.is_infinite()).count(), 1);
        assert_eq!(loader.state(), ClassState::Infinite);
        assert!(!loader.has_next());
        assert_eq!(loader.size(), ClassSize::Infinite);
        assert!(loader.members().all(|m| !m.is_infinite()));
    }

    #[test]
    fn markov_quiver_is_its_own_class() {
        let markov: Matrix = "{ {0 2 -2} {-2 0 2} {2 -2 0} }".parse().expect("parse");
        let mut loader = MutationClassLoader::new(markov);
        assert_eq!(loader.size(), ClassSize::Finite(1));
        assert_eq!(loader.stats().discovered, 1);
        assert!(loader.stats().seen >= 1);
    }

    #[test]
    fn contains_advances_only_as_needed() {
        let mut loader = MutationClassLoader::new(chain(5));
        assert!(loader.contains(&chain(5)));
        assert_eq!(loader.stats().mutations, 0);

        let far = chain(5).mutated(2).mutated(1).mutated(3);
        assert!(loader.contains(&far.permuted(&[4, 2, 0, 1, 3])));
        assert!(!loader.contains(&chain(4)));
        assert!(!loader.contains(&Matrix::zero(5)));
        assert_eq!(loader.state(), ClassState::Finite);
    }
}
