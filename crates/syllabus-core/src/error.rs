//! Error types for Syllabus Core

use std::path::PathBuf;

use thiserror::Error;

use crate::limits::ValidationError;

/// Result type alias using Syllabus's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Syllabus error types
///
/// Parsing, graph construction and subgraph selection never fail; these
/// variants cover reading scripts and looking up entities by id.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script {path:?} is not valid UTF-8")]
    InvalidEncoding { path: PathBuf },

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_convert() {
        let err: Error = crate::limits::validate_hop_radius(51).unwrap_err().into();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Hop radius too large: 51 (max 50)"
        );
    }

    #[test]
    fn test_messages_name_the_input() {
        assert_eq!(
            Error::EntityNotFound("PATH-7".into()).to_string(),
            "Entity not found: PATH-7"
        );
        assert_eq!(
            Error::InvalidEncoding {
                path: PathBuf::from("bad.cypher")
            }
            .to_string(),
            "Script \"bad.cypher\" is not valid UTF-8"
        );
    }
}
