//! Preset subgraph views
//!
//! Each view is a fixed [`SubgraphQuery`] shape: a curriculum overview, the
//! neighborhood of one learning path or concept, the unit-to-unit relationship
//! network, and a free node explorer.

use std::collections::BTreeSet;

use crate::entity::EntityKind;
use crate::error::{Error, Result};
use crate::graph::CurriculumGraph;
use crate::relation::RelationKind;
use crate::select::{select, SubgraphQuery};

/// Hop radius used by the path and concept views
pub const FOCUS_HOPS: u32 = 1;

/// Default radius of the node explorer
pub const DEFAULT_NODE_HOPS: u32 = 1;

/// Learning paths and concepts, optionally with every knowledge unit
pub fn overview(graph: &CurriculumGraph, include_units: bool) -> CurriculumGraph {
    let mut kinds = vec![EntityKind::LearningPath, EntityKind::Concept];
    if include_units {
        kinds.push(EntityKind::KnowledgeUnit);
    }
    select(graph, &SubgraphQuery::new().with_kinds(kinds))
}

/// A learning path, its included concepts and their direct neighbors
pub fn path_view(graph: &CurriculumGraph, path_id: &str) -> Result<CurriculumGraph> {
    let path = graph
        .node(path_id)
        .and_then(|n| n.entity.as_path())
        .ok_or_else(|| Error::EntityNotFound(path_id.to_string()))?;

    let mut seeds = vec![path.id.clone()];
    seeds.extend(
        graph
            .outgoing(path_id)
            .filter(|e| e.relation == RelationKind::Includes)
            .map(|e| e.target.clone()),
    );

    let query = SubgraphQuery::new().with_seeds(seeds).with_hops(FOCUS_HOPS);
    Ok(select(graph, &query))
}

/// A concept and its direct neighbors
pub fn concept_view(graph: &CurriculumGraph, concept_id: &str) -> Result<CurriculumGraph> {
    graph
        .node(concept_id)
        .filter(|n| n.kind == EntityKind::Concept)
        .ok_or_else(|| Error::EntityNotFound(concept_id.to_string()))?;

    let query = SubgraphQuery::new()
        .with_seeds([concept_id])
        .with_hops(FOCUS_HOPS);
    Ok(select(graph, &query))
}

/// All knowledge units with only the edges of the given relation kinds
///
/// An empty `relations` set keeps every edge among units.
pub fn relationships_view(
    graph: &CurriculumGraph,
    relations: &BTreeSet<RelationKind>,
) -> CurriculumGraph {
    let query = SubgraphQuery::new()
        .with_kinds([EntityKind::KnowledgeUnit])
        .with_relations(relations.iter().cloned());
    select(graph, &query)
}

/// Any entity and its neighborhood within `hops` rounds
pub fn node_view(graph: &CurriculumGraph, id: &str, hops: u32) -> Result<CurriculumGraph> {
    if !graph.contains(id) {
        return Err(Error::EntityNotFound(id.to_string()));
    }
    let query = SubgraphQuery::new().with_seeds([id]).with_hops(hops);
    Ok(select(graph, &query))
}

/// Initial relation selection for the relationships view
///
/// LEADS_TO and PRECEDES when LEADS_TO is present; otherwise the first two
/// available kinds.
pub fn default_relationship_selection(available: &BTreeSet<RelationKind>) -> Vec<RelationKind> {
    if available.contains(&RelationKind::LeadsTo) {
        vec![RelationKind::LeadsTo, RelationKind::Precedes]
    } else {
        available.iter().take(2).cloned().collect()
    }
}
