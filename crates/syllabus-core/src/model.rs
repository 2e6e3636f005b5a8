//! Parsed script model: entity tables and raw relationships

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::{Concept, KnowledgeUnit, LearningPath};
use crate::parser::Statement;
use crate::relation::{Membership, RelationKind, Relationship};

/// Everything recovered from one script
///
/// Entity tables are keyed by id; a later creation statement for the same id
/// replaces the earlier one. Relationships keep statement order and include
/// dangling ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedModel {
    pub knowledge_units: BTreeMap<String, KnowledgeUnit>,

    pub concepts: BTreeMap<String, Concept>,

    pub learning_paths: BTreeMap<String, LearningPath>,

    pub relationships: Vec<Relationship>,

    /// Concept id -> declared unit memberships, in statement order
    #[serde(default)]
    pub containment: BTreeMap<String, Vec<Membership>>,

    /// Learning path id -> declared concept memberships, in statement order
    #[serde(default)]
    pub inclusion: BTreeMap<String, Vec<Membership>>,
}

impl ParsedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one statement into the model
    pub fn apply(&mut self, statement: Statement) {
        match statement {
            Statement::CreateUnit(unit) => {
                self.knowledge_units.insert(unit.id.clone(), unit);
            }
            Statement::CreateConcept(concept) => {
                self.concepts.insert(concept.id.clone(), concept);
            }
            Statement::CreatePath(path) => {
                self.learning_paths.insert(path.id.clone(), path);
            }
            Statement::LinkUnits(relationship) => self.relationships.push(relationship),
            Statement::LinkContains {
                concept,
                unit,
                sequence,
            } => self
                .containment
                .entry(concept)
                .or_default()
                .push(Membership::new(unit, sequence)),
            Statement::LinkIncludes {
                path,
                concept,
                sequence,
            } => self
                .inclusion
                .entry(path)
                .or_default()
                .push(Membership::new(concept, sequence)),
            Statement::LinkPrerequisite {
                prerequisite,
                concept,
            } => self
                .relationships
                .push(Relationship::prerequisite(prerequisite, concept)),
        }
    }

    /// Total number of entities across the three tables
    pub fn entity_count(&self) -> usize {
        self.knowledge_units.len() + self.concepts.len() + self.learning_paths.len()
    }

    /// Distinct relation kinds among the raw relationships, sorted
    pub fn relation_kinds(&self) -> BTreeSet<RelationKind> {
        self.relationships
            .iter()
            .map(|r| r.relation.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0 && self.relationships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(id: &str, name: &str) -> Concept {
        Concept::new(id, name, "description", 10)
    }

    #[test]
    fn test_last_creation_wins() {
        let mut model = ParsedModel::new();
        model.apply(Statement::CreateConcept(concept("CONCEPT-1", "First")));
        model.apply(Statement::CreateConcept(concept("CONCEPT-1", "Second")));

        assert_eq!(model.concepts.len(), 1);
        assert_eq!(model.concepts["CONCEPT-1"].name, "Second");
    }

    #[test]
    fn test_memberships_accumulate_in_statement_order() {
        let mut model = ParsedModel::new();
        for (unit, sequence) in [("N3", 2), ("N1", 0)] {
            model.apply(Statement::LinkContains {
                concept: "CONCEPT-1".into(),
                unit: unit.into(),
                sequence,
            });
        }

        assert_eq!(
            model.containment["CONCEPT-1"],
            vec![Membership::new("N3", 2), Membership::new("N1", 0)]
        );
        assert!(model.relationships.is_empty());
    }

    #[test]
    fn test_relation_kinds() {
        let mut model = ParsedModel::new();
        model.apply(Statement::LinkUnits(Relationship::new(
            "N1", "N2", "PRECEDES", 1, "x",
        )));
        model.apply(Statement::LinkPrerequisite {
            prerequisite: "CONCEPT-1".into(),
            concept: "CONCEPT-2".into(),
        });
        model.apply(Statement::LinkUnits(Relationship::new(
            "N2", "N3", "PRECEDES", 1, "y",
        )));

        let kinds: Vec<_> = model.relation_kinds().into_iter().collect();
        assert_eq!(
            kinds,
            vec![RelationKind::Precedes, RelationKind::PrerequisiteFor]
        );
    }
}
