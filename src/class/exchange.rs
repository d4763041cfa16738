use petgraph::graph::{DiGraph, NodeIndex};

use crate::class::loader::{Explorable, MutationClassLoader};
use crate::class::model::{Link, MemberId};
use crate::config::ClassConfig;
use crate::matrix::Matrix;

/// A finite mutation class together with, for every member and vertex, the
/// member that mutation at that vertex leads to.
#[derive(Debug, Clone)]
pub struct ExchangeGraph<Q = Matrix> {
    members: Vec<Q>,
    links: Vec<Vec<Link>>,
}

impl<Q: Explorable> ExchangeGraph<Q> {
    /// Enumerate the class of `seed` with link tracking. Returns `None` for
    /// infinite classes.
    pub fn build(seed: Q) -> Option<Self> {
        let config = ClassConfig {
            track_links: true,
            ..ClassConfig::default()
        };
        let mut loader = MutationClassLoader::with_config(seed, &config);
        if !loader.size().is_finite() {
            return None;
        }
        let (members, links) = loader.into_parts();
        let links = links
            .into_iter()
            .map(|slots| slots.unwrap_or_default().into_iter().flatten().collect())
            .collect();
        Some(Self { members, links })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, id: MemberId) -> &Q {
        &self.members[id.0]
    }

    pub fn members(&self) -> impl Iterator<Item = (MemberId, &Q)> + '_ {
        self.members
            .iter()
            .enumerate()
            .map(|(idx, quiver)| (MemberId(idx), quiver))
    }

    /// One link per vertex, indexed by the vertex mutated at.
    pub fn neighbours(&self, id: MemberId) -> &[Link] {
        &self.links[id.0]
    }

    /// Number of (member, vertex) mutation arrows.
    pub fn arrow_count(&self) -> usize {
        self.links.iter().map(Vec::len).sum()
    }

    /// Directed graph with one node per member and one edge per mutation,
    /// weighted by the vertex mutated at.
    pub fn to_petgraph(&self) -> DiGraph<Q, usize> {
        let mut graph = DiGraph::with_capacity(self.members.len(), self.arrow_count());
        let nodes: Vec<NodeIndex> = self
            .members
            .iter()
            .map(|quiver| graph.add_node(quiver.clone()))
            .collect();
        for (source, links) in self.links.iter().enumerate() {
            for (vertex, link) in links.iter().enumerate() {
                graph.add_edge(nodes[source], nodes[link.target.0], vertex);
            }
        }
        graph
    }
}
