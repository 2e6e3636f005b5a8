//! CLI command implementations

use std::path::PathBuf;

use clap::Args;

pub mod completions;
pub mod config;
pub mod inspect;
pub mod io;
pub mod select;
pub mod summary;
pub mod view;

/// Script file argument shared by every graph command
#[derive(Args)]
pub struct ScriptArg {
    /// Path to the graph script
    pub script: PathBuf,
}

/// Reject ids that cannot name any entity
pub fn check_entity_id(id: &str) -> anyhow::Result<()> {
    if syllabus_core::EntityKind::from_id(id).is_none() {
        anyhow::bail!(
            "Malformed entity id '{}' (expected N<digits>, CONCEPT-<digits> or PATH-<digits>)",
            id
        );
    }
    Ok(())
}
