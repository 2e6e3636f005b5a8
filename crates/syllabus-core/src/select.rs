//! Subgraph selection by kind, seed neighborhood and relation kind

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::graph::CurriculumGraph;
use crate::relation::RelationKind;

/// Subgraph selection query (builder style)
///
/// Empty sets mean "no filter". With neither seeds nor kinds every node is
/// selected; otherwise the selection is the seed neighborhood united with
/// every node of a listed kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphQuery {
    /// Kinds whose nodes are all selected
    #[serde(default)]
    pub kinds: BTreeSet<EntityKind>,

    /// Seed entity ids; unknown ids are ignored
    #[serde(default)]
    pub seeds: BTreeSet<String>,

    /// Relation kinds whose edges are kept
    #[serde(default)]
    pub relations: BTreeSet<RelationKind>,

    /// Either-direction expansion rounds around the seeds
    #[serde(default)]
    pub hop_radius: u32,
}

impl SubgraphQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    pub fn with_seeds<S: Into<String>>(mut self, seeds: impl IntoIterator<Item = S>) -> Self {
        self.seeds.extend(seeds.into_iter().map(Into::into));
        self
    }

    pub fn with_relations<R: Into<RelationKind>>(
        mut self,
        relations: impl IntoIterator<Item = R>,
    ) -> Self {
        self.relations.extend(relations.into_iter().map(Into::into));
        self
    }

    pub fn with_hops(mut self, hops: u32) -> Self {
        self.hop_radius = hops;
        self
    }

    /// True when the query selects the whole graph
    pub fn is_unfiltered(&self) -> bool {
        self.kinds.is_empty() && self.seeds.is_empty() && self.relations.is_empty()
    }
}

/// Selection engine; holds no state of its own
pub struct SubgraphSelector;

impl SubgraphSelector {
    /// Produce the induced subgraph for `query`. The input graph is untouched.
    pub fn select(graph: &CurriculumGraph, query: &SubgraphQuery) -> CurriculumGraph {
        if query.is_unfiltered() {
            return graph.clone();
        }

        let selected = Self::selected_nodes(graph, query);

        let mut subgraph = CurriculumGraph::new();
        for (node, keep) in graph.nodes().zip(&selected) {
            if *keep {
                subgraph.insert_node(node.entity.clone());
            }
        }

        for edge in graph.edges() {
            if !query.relations.is_empty() && !query.relations.contains(&edge.relation) {
                continue;
            }
            // endpoints outside the selection are rejected by upsert_edge
            subgraph.upsert_edge(edge.clone());
        }

        tracing::debug!(
            "Selected {} of {} nodes and {} of {} edges",
            subgraph.node_count(),
            graph.node_count(),
            subgraph.edge_count(),
            graph.edge_count()
        );

        subgraph
    }

    /// Membership mask over the graph's node indices
    fn selected_nodes(graph: &CurriculumGraph, query: &SubgraphQuery) -> Vec<bool> {
        let count = graph.node_count();

        if query.seeds.is_empty() && query.kinds.is_empty() {
            return vec![true; count];
        }

        let mut selected = vec![false; count];

        if !query.seeds.is_empty() {
            let seeds: Vec<usize> = query
                .seeds
                .iter()
                .filter_map(|id| graph.index_of(id))
                .collect();
            tracing::debug!(
                "Resolved {} of {} seed ids",
                seeds.len(),
                query.seeds.len()
            );
            Self::expand(graph, &seeds, query.hop_radius, &mut selected);
        }

        if !query.kinds.is_empty() {
            for (idx, node) in graph.nodes().enumerate() {
                if query.kinds.contains(&node.kind) {
                    selected[idx] = true;
                }
            }
        }

        selected
    }

    /// Frontier BFS over undirected adjacency, `hops` rounds deep
    fn expand(graph: &CurriculumGraph, seeds: &[usize], hops: u32, selected: &mut [bool]) {
        let mut queue: VecDeque<(usize, u32)> = VecDeque::new();
        let mut visited = vec![false; selected.len()];

        for &seed in seeds {
            if !visited[seed] {
                visited[seed] = true;
                queue.push_back((seed, 0));
            }
        }

        while let Some((idx, depth)) = queue.pop_front() {
            selected[idx] = true;
            if depth >= hops {
                continue;
            }
            for neighbor in graph.neighbor_indices(idx) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
    }
}

/// Convenience wrapper around [`SubgraphSelector::select`]
pub fn select(graph: &CurriculumGraph, query: &SubgraphQuery) -> CurriculumGraph {
    SubgraphSelector::select(graph, query)
}
