//! Flat node and edge rows for tabular export

use serde::Serialize;

use crate::entity::{compare_ids, Difficulty, EntityKind};
use crate::graph::{CurriculumGraph, GraphEdge, GraphNode};
use crate::relation::RelationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub id: String,
    pub kind: EntityKind,
    pub label: String,
    /// Set for knowledge units only
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "estimatedMinutes")]
    pub estimated_minutes: u32,
    pub description: String,
}

impl From<&GraphNode> for NodeRow {
    fn from(node: &GraphNode) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            difficulty: node.entity.as_unit().map(|u| u.difficulty),
            estimated_minutes: node.entity.estimated_minutes(),
            description: node.entity.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRow {
    pub source: String,
    pub source_label: String,
    pub source_kind: Option<EntityKind>,
    pub target: String,
    pub target_label: String,
    pub target_kind: Option<EntityKind>,
    pub relation: RelationKind,
    pub strength: Option<u32>,
    pub justification: Option<String>,
    pub position: Option<usize>,
}

impl EdgeRow {
    fn new(graph: &CurriculumGraph, edge: &GraphEdge) -> Self {
        let source = graph.node(&edge.source);
        let target = graph.node(&edge.target);
        Self {
            source: edge.source.clone(),
            source_label: source.map(|n| n.label.clone()).unwrap_or_default(),
            source_kind: source.map(|n| n.kind),
            target: edge.target.clone(),
            target_label: target.map(|n| n.label.clone()).unwrap_or_default(),
            target_kind: target.map(|n| n.kind),
            relation: edge.relation.clone(),
            strength: edge.strength(),
            justification: edge.justification().map(str::to_string),
            position: edge.position(),
        }
    }
}

/// One row per node, sorted by kind then id
pub fn node_rows(graph: &CurriculumGraph) -> Vec<NodeRow> {
    let mut rows: Vec<NodeRow> = graph.nodes().map(NodeRow::from).collect();
    rows.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| compare_ids(&a.id, &b.id)));
    rows
}

/// One row per edge, in graph order
pub fn edge_rows(graph: &CurriculumGraph) -> Vec<EdgeRow> {
    graph.edges().map(|e| EdgeRow::new(graph, e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const SCRIPT: &str = r#"
CREATE (n:KnowledgeNode {id: "N1", title: "Needs", description: "What users need", difficulty: "Advanced", estimatedMinutes: 25, source_lesson: "L1", source_title: "T"});
CREATE (c:Concept {id: "CONCEPT-1", name: "Research", description: "Finding out", estimatedMinutes: 40});
MATCH (c:Concept {id: "CONCEPT-1"}), (n:KnowledgeNode {id: "N1"}) CREATE (c)-[:CONTAINS {sequence: 4}]->(n);
"#;

    #[test]
    fn test_node_rows() {
        let graph = CurriculumGraph::from_model(&parse(SCRIPT));
        let rows = node_rows(&graph);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "N1");
        assert_eq!(rows[0].difficulty, Some(Difficulty::Advanced));
        assert_eq!(rows[0].estimated_minutes, 25);
        assert_eq!(rows[1].kind, EntityKind::Concept);
        assert_eq!(rows[1].difficulty, None);
    }

    #[test]
    fn test_edge_rows() {
        let graph = CurriculumGraph::from_model(&parse(SCRIPT));
        let rows = edge_rows(&graph);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.source_label, "Research");
        assert_eq!(row.target_kind, Some(EntityKind::KnowledgeUnit));
        assert_eq!(row.relation, RelationKind::Contains);
        assert_eq!(row.position, Some(1));
        assert_eq!(row.strength, None);
        assert_eq!(row.justification, None);
    }
}
