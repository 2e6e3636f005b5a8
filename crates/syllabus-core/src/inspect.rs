//! Entity inspection: typed, role-labeled neighbors of one node

use serde::Serialize;

use crate::entity::{compare_ids, Concept, EntityKind, KnowledgeUnit, LearningPath};
use crate::error::{Error, Result};
use crate::graph::{CurriculumGraph, GraphEdge};
use crate::relation::RelationKind;

/// A neighboring entity, by id and display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborRef {
    pub id: String,
    pub label: String,
}

/// A peer knowledge unit reached over a semantic relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedUnit {
    pub id: String,
    pub label: String,
    pub relation: RelationKind,
    pub strength: Option<u32>,
}

/// A member of a concept or path, with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionedRef {
    pub id: String,
    pub label: String,
    pub position: usize,
}

/// Everything the inspector knows about one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum EntityView {
    KnowledgeUnit {
        unit: KnowledgeUnit,
        containing_concepts: Vec<NeighborRef>,
        outgoing: Vec<RelatedUnit>,
        incoming: Vec<RelatedUnit>,
    },
    Concept {
        concept: Concept,
        including_paths: Vec<NeighborRef>,
        prerequisites: Vec<NeighborRef>,
        dependents: Vec<NeighborRef>,
        units: Vec<PositionedRef>,
    },
    LearningPath {
        path: LearningPath,
        key_competencies: Vec<String>,
        concepts: Vec<PositionedRef>,
    },
}

impl EntityView {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::KnowledgeUnit { .. } => EntityKind::KnowledgeUnit,
            Self::Concept { .. } => EntityKind::Concept,
            Self::LearningPath { .. } => EntityKind::LearningPath,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::KnowledgeUnit { unit, .. } => &unit.id,
            Self::Concept { concept, .. } => &concept.id,
            Self::LearningPath { path, .. } => &path.id,
        }
    }
}

/// Describe the entity `id`
///
/// Fails only when `id` is not a node of `graph`; missing neighbors simply
/// produce empty lists.
pub fn describe(graph: &CurriculumGraph, id: &str) -> Result<EntityView> {
    let node = graph.node(id).ok_or_else(|| not_found(id))?;

    let view = match node.kind {
        EntityKind::KnowledgeUnit => {
            let unit = node.entity.as_unit().cloned().ok_or_else(|| not_found(id))?;
            EntityView::KnowledgeUnit {
                containing_concepts: neighbors(
                    graph,
                    graph.incoming(id).filter(|e| e.relation == RelationKind::Contains),
                    |e| &e.source,
                ),
                outgoing: related_units(graph, graph.outgoing(id), |e| &e.target),
                incoming: related_units(graph, graph.incoming(id), |e| &e.source),
                unit,
            }
        }
        EntityKind::Concept => {
            let concept = node
                .entity
                .as_concept()
                .cloned()
                .ok_or_else(|| not_found(id))?;
            EntityView::Concept {
                including_paths: neighbors(
                    graph,
                    graph.incoming(id).filter(|e| e.relation == RelationKind::Includes),
                    |e| &e.source,
                ),
                prerequisites: neighbors(
                    graph,
                    graph
                        .incoming(id)
                        .filter(|e| e.relation == RelationKind::PrerequisiteFor),
                    |e| &e.source,
                ),
                dependents: neighbors(
                    graph,
                    graph
                        .outgoing(id)
                        .filter(|e| e.relation == RelationKind::PrerequisiteFor),
                    |e| &e.target,
                ),
                units: positioned(graph, id, RelationKind::Contains),
                concept,
            }
        }
        EntityKind::LearningPath => {
            let path = node.entity.as_path().cloned().ok_or_else(|| not_found(id))?;
            EntityView::LearningPath {
                key_competencies: path.key_competencies.clone(),
                concepts: positioned(graph, id, RelationKind::Includes),
                path,
            }
        }
    };

    Ok(view)
}

fn not_found(id: &str) -> Error {
    Error::EntityNotFound(id.to_string())
}

fn label_of(graph: &CurriculumGraph, id: &str) -> String {
    graph
        .node(id)
        .map(|n| n.label.clone())
        .unwrap_or_default()
}

fn neighbors<'g>(
    graph: &CurriculumGraph,
    edges: impl Iterator<Item = &'g GraphEdge>,
    endpoint: impl Fn(&'g GraphEdge) -> &'g String,
) -> Vec<NeighborRef> {
    let mut refs: Vec<NeighborRef> = edges
        .map(|e| {
            let id = endpoint(e);
            NeighborRef {
                id: id.clone(),
                label: label_of(graph, id),
            }
        })
        .collect();
    refs.sort_by(|a, b| compare_ids(&a.id, &b.id));
    refs
}

/// Peer units across semantic edges, sorted by id then relation
fn related_units<'g>(
    graph: &CurriculumGraph,
    edges: impl Iterator<Item = &'g GraphEdge>,
    endpoint: impl Fn(&'g GraphEdge) -> &'g String,
) -> Vec<RelatedUnit> {
    let mut related: Vec<RelatedUnit> = edges
        .filter(|e| !e.relation.is_structural())
        .filter_map(|e| {
            let id = endpoint(e);
            let node = graph.node(id)?;
            (node.kind == EntityKind::KnowledgeUnit).then(|| RelatedUnit {
                id: id.clone(),
                label: node.label.clone(),
                relation: e.relation.clone(),
                strength: e.strength(),
            })
        })
        .collect();
    related.sort_by(|a, b| compare_ids(&a.id, &b.id).then_with(|| a.relation.cmp(&b.relation)));
    related
}

/// Members reached over a structural relation, ordered by position
fn positioned(graph: &CurriculumGraph, owner: &str, relation: RelationKind) -> Vec<PositionedRef> {
    let mut members: Vec<PositionedRef> = graph
        .outgoing(owner)
        .filter(|e| e.relation == relation)
        .map(|e| PositionedRef {
            id: e.target.clone(),
            label: label_of(graph, &e.target),
            position: e.position().unwrap_or_default(),
        })
        .collect();
    members.sort_by_key(|m| m.position);
    members
}
