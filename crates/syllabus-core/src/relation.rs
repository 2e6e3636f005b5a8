//! Relationship (edge) types

use serde::{Deserialize, Serialize};

/// Justification recorded for concept prerequisite statements
pub const PREREQUISITE_JUSTIFICATION: &str = "Prerequisite concept";

/// Strength recorded for concept prerequisite statements
pub const PREREQUISITE_STRENGTH: u32 = 4;

/// Kind of a relationship between two entities
///
/// Unknown relation names from a script are kept verbatim in `Other`.
/// Kinds order by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationKind {
    LeadsTo,
    Precedes,
    Requires,
    RelatedTo,
    Enables,
    PartOf,
    Supports,
    Influences,
    PrerequisiteFor,
    Contains,
    Includes,
    Other(String),
}

impl RelationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LeadsTo => "LEADS_TO",
            Self::Precedes => "PRECEDES",
            Self::Requires => "REQUIRES",
            Self::RelatedTo => "RELATED_TO",
            Self::Enables => "ENABLES",
            Self::PartOf => "PART_OF",
            Self::Supports => "SUPPORTS",
            Self::Influences => "INFLUENCES",
            Self::PrerequisiteFor => "PREREQUISITE_FOR",
            Self::Contains => "CONTAINS",
            Self::Includes => "INCLUDES",
            Self::Other(name) => name,
        }
    }

    /// CONTAINS and INCLUDES carry a position instead of strength/justification
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Contains | Self::Includes)
    }
}

impl From<&str> for RelationKind {
    fn from(s: &str) -> Self {
        match s {
            "LEADS_TO" => Self::LeadsTo,
            "PRECEDES" => Self::Precedes,
            "REQUIRES" => Self::Requires,
            "RELATED_TO" => Self::RelatedTo,
            "ENABLES" => Self::Enables,
            "PART_OF" => Self::PartOf,
            "SUPPORTS" => Self::Supports,
            "INFLUENCES" => Self::Influences,
            "PREREQUISITE_FOR" => Self::PrerequisiteFor,
            "CONTAINS" => Self::Contains,
            "INCLUDES" => Self::Includes,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RelationKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<RelationKind> for String {
    fn from(kind: RelationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Ord for RelationKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for RelationKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relationship statement recovered from a script
///
/// Relationships are kept even when an endpoint was never created; the graph
/// builder drops them at edge materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Source entity id
    pub source: String,

    /// Target entity id
    pub target: String,

    /// Type of relationship
    #[serde(rename = "type")]
    pub relation: RelationKind,

    /// Strength of the relationship
    pub strength: u32,

    /// Free-text justification
    pub justification: String,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<RelationKind>,
        strength: u32,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            strength,
            justification: justification.into(),
        }
    }

    /// A concept prerequisite relationship with the fixed payload
    pub fn prerequisite(prerequisite: impl Into<String>, concept: impl Into<String>) -> Self {
        Self::new(
            prerequisite,
            concept,
            RelationKind::PrerequisiteFor,
            PREREQUISITE_STRENGTH,
            PREREQUISITE_JUSTIFICATION,
        )
    }
}

/// A declared membership of a unit in a concept, or of a concept in a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Member entity id
    pub member: String,

    /// Declared sequence number from the script
    pub sequence: u32,
}

impl Membership {
    pub fn new(member: impl Into<String>, sequence: u32) -> Self {
        Self {
            member: member.into(),
            sequence,
        }
    }
}

/// Order members by declared sequence; ties keep statement order
pub fn rank_members(members: &[Membership]) -> Vec<String> {
    let mut ranked: Vec<&Membership> = members.iter().collect();
    ranked.sort_by_key(|m| m.sequence);
    ranked.into_iter().map(|m| m.member.clone()).collect()
}
