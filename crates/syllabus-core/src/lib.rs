//! Syllabus Core - curriculum script parser and graph engine
//!
//! This crate turns a curriculum script (knowledge units, concepts and
//! learning paths plus their relationships) into an in-memory directed
//! property graph, and derives filtered subgraphs and per-entity views from it.

pub mod cache;
pub mod entity;
pub mod error;
pub mod export;
pub mod graph;
pub mod inspect;
pub mod limits;
pub mod model;
pub mod parser;
pub mod relation;
pub mod select;
pub mod source;
pub mod views;

pub use cache::{ContentHash, GraphCache, LoadedScript};
pub use entity::{compare_ids, Concept, Difficulty, Entity, EntityKind, KnowledgeUnit, LearningPath};
pub use error::{Error, Result};
pub use export::{edge_rows, node_rows, EdgeRow, NodeRow};
pub use graph::{build, CurriculumGraph, EdgeAttributes, GraphEdge, GraphNode};
pub use inspect::{describe, EntityView, NeighborRef, PositionedRef, RelatedUnit};
pub use limits::ValidationError;
pub use model::ParsedModel;
pub use parser::{parse, Statement, StatementScanner};
pub use relation::{Membership, RelationKind, Relationship};
pub use select::{select, SubgraphQuery, SubgraphSelector};
pub use source::{load_and_build, load_script};
