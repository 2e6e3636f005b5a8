//! Directed property graph of curriculum entities
//!
//! Nodes are stored densely and addressed by index; a forward and a reverse
//! adjacency list are maintained alongside so neighbor lookups are O(degree).
//! The graph is only mutated while it is being built; afterwards it is shared
//! read-only.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::entity::{compare_ids, Entity, EntityKind};
use crate::model::ParsedModel;
use crate::relation::{rank_members, Membership, RelationKind};

/// A node: entity record plus its kind tag and display label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: EntityKind,
    pub label: String,
    pub entity: Entity,
}

impl GraphNode {
    pub fn new(entity: Entity) -> Self {
        Self {
            id: entity.id().to_string(),
            kind: entity.kind(),
            label: entity.label().to_string(),
            entity,
        }
    }
}

/// Edge payload: semantic edges carry strength and justification,
/// structural edges carry a 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EdgeAttributes {
    Semantic { strength: u32, justification: String },
    Structural { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: RelationKind,
    #[serde(flatten)]
    pub attributes: EdgeAttributes,
}

impl GraphEdge {
    pub fn strength(&self) -> Option<u32> {
        match self.attributes {
            EdgeAttributes::Semantic { strength, .. } => Some(strength),
            EdgeAttributes::Structural { .. } => None,
        }
    }

    pub fn justification(&self) -> Option<&str> {
        match &self.attributes {
            EdgeAttributes::Semantic { justification, .. } => Some(justification),
            EdgeAttributes::Structural { .. } => None,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self.attributes {
            EdgeAttributes::Structural { position } => Some(position),
            EdgeAttributes::Semantic { .. } => None,
        }
    }
}

/// The curriculum graph
///
/// At most one edge exists per (source, target, relation); inserting the same
/// triple again overwrites the attributes in place.
#[derive(Debug, Clone, Default)]
pub struct CurriculumGraph {
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(usize, usize, RelationKind), usize>,
    /// `outgoing[i]` = indices into `edges` whose source is node `i`
    outgoing: Vec<Vec<usize>>,
    /// `incoming[i]` = indices into `edges` whose target is node `i`
    incoming: Vec<Vec<usize>>,
}

impl CurriculumGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a parsed script
    ///
    /// Dangling relationships and memberships of unknown entities are dropped
    /// silently.
    pub fn from_model(model: &ParsedModel) -> Self {
        let mut graph = Self::new();

        for unit in model.knowledge_units.values() {
            graph.insert_node(unit.clone().into());
        }
        for concept in model.concepts.values() {
            graph.insert_node(concept.clone().into());
        }
        for path in model.learning_paths.values() {
            graph.insert_node(path.clone().into());
        }

        let mut dropped = 0;
        for rel in &model.relationships {
            let edge = GraphEdge {
                source: rel.source.clone(),
                target: rel.target.clone(),
                relation: rel.relation.clone(),
                attributes: EdgeAttributes::Semantic {
                    strength: rel.strength,
                    justification: rel.justification.clone(),
                },
            };
            if !graph.upsert_edge(edge) {
                dropped += 1;
                tracing::debug!(
                    "Dropping dangling relationship {} -[{}]-> {}",
                    rel.source,
                    rel.relation,
                    rel.target
                );
            }
        }

        for (concept_id, members) in &model.containment {
            graph.link_members(concept_id, members, EntityKind::Concept, RelationKind::Contains);
        }
        for (path_id, members) in &model.inclusion {
            graph.link_members(path_id, members, EntityKind::LearningPath, RelationKind::Includes);
        }

        tracing::info!(
            "Built graph with {} nodes and {} edges ({} dangling relationships dropped)",
            graph.node_count(),
            graph.edge_count(),
            dropped
        );

        graph
    }

    /// Rank the members of a concept or path, record the ranked id list on
    /// the owner and add one positioned structural edge per member
    fn link_members(
        &mut self,
        owner_id: &str,
        members: &[Membership],
        owner_kind: EntityKind,
        relation: RelationKind,
    ) {
        let Some(&owner) = self.node_index.get(owner_id) else {
            tracing::debug!("Skipping memberships of unknown {} {}", owner_kind, owner_id);
            return;
        };
        if self.nodes[owner].kind != owner_kind || members.is_empty() {
            return;
        }

        let ranked = rank_members(members);

        for (rank, member_id) in ranked.iter().enumerate() {
            self.upsert_edge(GraphEdge {
                source: owner_id.to_string(),
                target: member_id.clone(),
                relation: relation.clone(),
                attributes: EdgeAttributes::Structural { position: rank + 1 },
            });
        }

        match &mut self.nodes[owner].entity {
            Entity::Concept(concept) => concept.sequence = ranked,
            Entity::LearningPath(path) => path.concept_sequence = ranked,
            Entity::KnowledgeUnit(_) => {}
        }
    }

    /// Add a node; a node with the same id is replaced
    pub(crate) fn insert_node(&mut self, entity: Entity) -> usize {
        let node = GraphNode::new(entity);
        if let Some(&idx) = self.node_index.get(&node.id) {
            self.nodes[idx] = node;
            return idx;
        }
        let idx = self.nodes.len();
        self.node_index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        idx
    }

    /// Add an edge between existing nodes. Returns false when an endpoint is
    /// missing, in which case the graph is unchanged.
    pub(crate) fn upsert_edge(&mut self, edge: GraphEdge) -> bool {
        let (Some(&src), Some(&tgt)) = (
            self.node_index.get(&edge.source),
            self.node_index.get(&edge.target),
        ) else {
            return false;
        };

        let key = (src, tgt, edge.relation.clone());
        if let Some(&existing) = self.edge_index.get(&key) {
            self.edges[existing] = edge;
            return true;
        }

        let idx = self.edges.len();
        self.edges.push(edge);
        self.edge_index.insert(key, idx);
        self.outgoing[src].push(idx);
        self.incoming[tgt].push(idx);
        true
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn edge(&self, source: &str, target: &str, relation: &RelationKind) -> Option<&GraphEdge> {
        let src = *self.node_index.get(source)?;
        let tgt = *self.node_index.get(target)?;
        self.edge_index
            .get(&(src, tgt, relation.clone()))
            .map(|&idx| &self.edges[idx])
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    /// Edges leaving `id` (empty for unknown ids)
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.adjacent(id, &self.outgoing)
    }

    /// Edges arriving at `id` (empty for unknown ids)
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &GraphEdge> {
        self.adjacent(id, &self.incoming)
    }

    fn adjacent<'a>(
        &'a self,
        id: &str,
        adjacency: &'a [Vec<usize>],
    ) -> impl Iterator<Item = &'a GraphEdge> {
        self.node_index
            .get(id)
            .map(|&idx| adjacency[idx].as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&e| &self.edges[e])
    }

    /// Nodes of one kind, sorted by id
    pub fn nodes_of_kind(&self, kind: EntityKind) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = self.nodes.iter().filter(|n| n.kind == kind).collect();
        nodes.sort_by(|a, b| compare_ids(&a.id, &b.id));
        nodes
    }

    /// Distinct relation kinds present on edges, sorted
    pub fn relation_kinds(&self) -> BTreeSet<RelationKind> {
        self.edges.iter().map(|e| e.relation.clone()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Indices of the direct successors and predecessors of node `idx`
    pub(crate) fn neighbor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let successors = self.outgoing[idx]
            .iter()
            .map(move |&e| self.node_index[&self.edges[e].target]);
        let predecessors = self.incoming[idx]
            .iter()
            .map(move |&e| self.node_index[&self.edges[e].source]);
        successors.chain(predecessors)
    }
}

/// Build the graph for a parsed script
pub fn build(model: &ParsedModel) -> CurriculumGraph {
    CurriculumGraph::from_model(model)
}
