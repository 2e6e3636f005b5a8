//! Entity (node) types: knowledge units, concepts and learning paths

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::validate_entity_id;

/// Entity kind classification
///
/// The kind is implied by the id prefix, which keeps ids unique across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    KnowledgeUnit,
    Concept,
    LearningPath,
}

impl EntityKind {
    /// All kinds, in hierarchy order (leaf first)
    pub const ALL: [EntityKind; 3] = [Self::KnowledgeUnit, Self::Concept, Self::LearningPath];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeUnit => "KnowledgeUnit",
            Self::Concept => "Concept",
            Self::LearningPath => "LearningPath",
        }
    }

    /// Prefix every id of this kind starts with
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::KnowledgeUnit => "N",
            Self::Concept => "CONCEPT-",
            Self::LearningPath => "PATH-",
        }
    }

    /// Infer the kind from a well-formed id
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| validate_entity_id(*kind, id).is_ok())
    }
}

/// Order ids by prefix, then by numeric suffix, so `N2` sorts before `N10`
pub fn compare_ids(a: &str, b: &str) -> std::cmp::Ordering {
    fn split(id: &str) -> (&str, Option<u64>) {
        let prefix = id.trim_end_matches(|c: char| c.is_ascii_digit());
        (prefix, id[prefix.len()..].parse().ok())
    }
    split(a).cmp(&split(b)).then_with(|| a.cmp(b))
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an entity kind name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity kind: {0} (expected KnowledgeUnit, Concept or LearningPath)")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "knowledgeunit" | "knowledgenode" | "unit" | "node" => Ok(Self::KnowledgeUnit),
            "concept" => Ok(Self::Concept),
            "learningpath" | "path" => Ok(Self::LearningPath),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// Difficulty of a knowledge unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    Unspecified,
}

impl Difficulty {
    /// Map a script literal to a difficulty; unknown labels are `Unspecified`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Unspecified => "Unspecified",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The atomic learning item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeUnit {
    /// Unique identifier (`N<digits>`)
    pub id: String,

    pub title: String,

    pub description: String,

    pub difficulty: Difficulty,

    /// Estimated duration in minutes
    #[serde(rename = "estimatedMinutes")]
    pub estimated_minutes: u32,

    /// Lesson this unit was extracted from
    pub source_lesson: String,

    pub source_title: String,
}

/// An ordered grouping of knowledge units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Unique identifier (`CONCEPT-<digits>`)
    pub id: String,

    pub name: String,

    pub description: String,

    #[serde(rename = "estimatedMinutes")]
    pub estimated_minutes: u32,

    /// Contained unit ids ordered by declared sequence (set by the graph builder)
    #[serde(default)]
    pub sequence: Vec<String>,
}

impl Concept {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            estimated_minutes,
            sequence: Vec::new(),
        }
    }
}

/// An ordered grouping of concepts forming a curriculum track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Unique identifier (`PATH-<digits>`)
    pub id: String,

    pub name: String,

    pub description: String,

    #[serde(rename = "targetAudience")]
    pub target_audience: String,

    #[serde(rename = "keyCompetencies")]
    pub key_competencies: Vec<String>,

    #[serde(rename = "estimatedMinutes")]
    pub estimated_minutes: u32,

    /// Included concept ids ordered by declared sequence (set by the graph builder)
    #[serde(rename = "conceptSequence", default)]
    pub concept_sequence: Vec<String>,
}

impl LearningPath {
    /// Split a `;`-joined competency list; an empty string yields no competencies
    pub fn split_competencies(joined: &str) -> Vec<String> {
        if joined.is_empty() {
            return Vec::new();
        }
        joined.split(';').map(str::to_string).collect()
    }
}

/// Any entity that can become a graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Entity {
    KnowledgeUnit(KnowledgeUnit),
    Concept(Concept),
    LearningPath(LearningPath),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Self::KnowledgeUnit(unit) => &unit.id,
            Self::Concept(concept) => &concept.id,
            Self::LearningPath(path) => &path.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::KnowledgeUnit(_) => EntityKind::KnowledgeUnit,
            Self::Concept(_) => EntityKind::Concept,
            Self::LearningPath(_) => EntityKind::LearningPath,
        }
    }

    /// Display label: the unit title, or the concept/path name
    pub fn label(&self) -> &str {
        match self {
            Self::KnowledgeUnit(unit) => &unit.title,
            Self::Concept(concept) => &concept.name,
            Self::LearningPath(path) => &path.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::KnowledgeUnit(unit) => &unit.description,
            Self::Concept(concept) => &concept.description,
            Self::LearningPath(path) => &path.description,
        }
    }

    pub fn estimated_minutes(&self) -> u32 {
        match self {
            Self::KnowledgeUnit(unit) => unit.estimated_minutes,
            Self::Concept(concept) => concept.estimated_minutes,
            Self::LearningPath(path) => path.estimated_minutes,
        }
    }

    pub fn as_unit(&self) -> Option<&KnowledgeUnit> {
        match self {
            Self::KnowledgeUnit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn as_concept(&self) -> Option<&Concept> {
        match self {
            Self::Concept(concept) => Some(concept),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&LearningPath> {
        match self {
            Self::LearningPath(path) => Some(path),
            _ => None,
        }
    }
}

impl From<KnowledgeUnit> for Entity {
    fn from(unit: KnowledgeUnit) -> Self {
        Self::KnowledgeUnit(unit)
    }
}

impl From<Concept> for Entity {
    fn from(concept: Concept) -> Self {
        Self::Concept(concept)
    }
}

impl From<LearningPath> for Entity {
    fn from(path: LearningPath) -> Self {
        Self::LearningPath(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_id() {
        assert_eq!(EntityKind::from_id("N7"), Some(EntityKind::KnowledgeUnit));
        assert_eq!(EntityKind::from_id("CONCEPT-2"), Some(EntityKind::Concept));
        assert_eq!(EntityKind::from_id("PATH-10"), Some(EntityKind::LearningPath));
        assert_eq!(EntityKind::from_id("NODE-1"), None);
        assert_eq!(EntityKind::from_id("CONCEPT-"), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("KnowledgeNode".parse(), Ok(EntityKind::KnowledgeUnit));
        assert_eq!("knowledge-unit".parse(), Ok(EntityKind::KnowledgeUnit));
        assert_eq!("concept".parse(), Ok(EntityKind::Concept));
        assert_eq!("Learning_Path".parse(), Ok(EntityKind::LearningPath));
        assert!("lesson".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_difficulty_from_label() {
        assert_eq!(Difficulty::from_label("Beginner"), Difficulty::Beginner);
        assert_eq!(Difficulty::from_label("advanced"), Difficulty::Advanced);
        assert_eq!(Difficulty::from_label("Expert"), Difficulty::Unspecified);
        assert_eq!(Difficulty::from_label(""), Difficulty::Unspecified);
    }

    #[test]
    fn test_split_competencies() {
        assert_eq!(
            LearningPath::split_competencies("Empathy;Research;Mapping"),
            vec!["Empathy", "Research", "Mapping"]
        );
        assert!(LearningPath::split_competencies("").is_empty());
    }

    #[test]
    fn test_entity_accessors() {
        let entity: Entity = Concept::new("CONCEPT-1", "Journeys", "Journey maps", 45).into();

        assert_eq!(entity.id(), "CONCEPT-1");
        assert_eq!(entity.kind(), EntityKind::Concept);
        assert_eq!(entity.label(), "Journeys");
        assert_eq!(entity.estimated_minutes(), 45);
        assert!(entity.as_concept().is_some_and(|c| c.sequence.is_empty()));
        assert!(entity.as_unit().is_none());
    }

    #[test]
    fn test_entity_json_carries_kind_tag() {
        let entity: Entity = Concept::new("CONCEPT-1", "Journeys", "Journey maps", 45).into();
        let json = serde_json::to_value(&entity).unwrap();

        assert_eq!(json["kind"], "Concept");
        assert_eq!(json["estimatedMinutes"], 45);
    }

    #[test]
    fn test_compare_ids_orders_numerically() {
        let mut ids = vec!["N10", "CONCEPT-2", "N2", "N1", "CONCEPT-11", "PATH-3"];
        ids.sort_by(|a, b| compare_ids(a, b));

        assert_eq!(ids, vec!["CONCEPT-2", "CONCEPT-11", "N1", "N2", "N10", "PATH-3"]);
    }
}
