//! Input validation limits for scripts and queries

use crate::entity::EntityKind;

/// Maximum size of a script file accepted by the loader (64MB)
pub const MAX_SCRIPT_BYTES: u64 = 64 * 1024 * 1024;

/// Maximum neighborhood radius accepted from callers (50)
pub const MAX_HOP_RADIUS: u32 = 50;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    ScriptTooLarge { len: u64, max: u64 },
    HopRadiusTooLarge { hops: u32, max: u32 },
    MalformedId { kind: EntityKind, id: String },
    EmptyId,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScriptTooLarge { len, max } => {
                write!(f, "Script too large: {} bytes (max {})", len, max)
            }
            Self::HopRadiusTooLarge { hops, max } => {
                write!(f, "Hop radius too large: {} (max {})", hops, max)
            }
            Self::MalformedId { kind, id } => {
                write!(
                    f,
                    "Malformed {} id '{}' (expected {}<digits>)",
                    kind,
                    id,
                    kind.id_prefix()
                )
            }
            Self::EmptyId => write!(f, "Entity id cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate script size in bytes
pub fn validate_script_size(len: u64) -> Result<(), ValidationError> {
    if len > MAX_SCRIPT_BYTES {
        return Err(ValidationError::ScriptTooLarge {
            len,
            max: MAX_SCRIPT_BYTES,
        });
    }
    Ok(())
}

/// Validate neighborhood radius
pub fn validate_hop_radius(hops: u32) -> Result<(), ValidationError> {
    if hops > MAX_HOP_RADIUS {
        return Err(ValidationError::HopRadiusTooLarge {
            hops,
            max: MAX_HOP_RADIUS,
        });
    }
    Ok(())
}

/// Validate that `id` has the `<prefix><digits>` shape of the given kind
pub fn validate_entity_id(kind: EntityKind, id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    let well_formed = id
        .strip_prefix(kind.id_prefix())
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(ValidationError::MalformedId {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}
