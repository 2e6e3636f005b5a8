//! CLI configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use syllabus_core::limits::validate_hop_radius;
use syllabus_core::views::DEFAULT_NODE_HOPS;
use syllabus_core::RelationKind;

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SYLLABUS_CONFIG";

/// Config file location: `$SYLLABUS_CONFIG`, else `<config dir>/syllabus/config.toml`
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("syllabus")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format used when `--format` is not given
    pub format: OutputFormat,

    /// Neighborhood radius for `view node`
    pub hops: u32,

    /// Include knowledge units in `view overview`
    pub overview_units: bool,

    /// Relation kinds for `view relationships`; empty picks a default
    pub relations: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            hops: DEFAULT_NODE_HOPS,
            overview_units: false,
            relations: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or broken
    pub fn load() -> Self {
        let path = config_file_path();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        let parsed = std::fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| toml::from_str::<Self>(&text).map_err(anyhow::Error::from));

        match parsed {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["format", "hops", "overview_units", "relations"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "format" => Some(self.format.as_str().to_string()),
            "hops" => Some(self.hops.to_string()),
            "overview_units" => Some(self.overview_units.to_string()),
            "relations" => Some(self.relations.join(",")),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "format" => self.format = value.parse()?,
            "hops" => {
                let hops: u32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("hops must be a non-negative integer"))?;
                validate_hop_radius(hops)?;
                self.hops = hops;
            }
            "overview_units" => {
                self.overview_units = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("overview_units must be true or false"))?;
            }
            "relations" => {
                self.relations = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_uppercase)
                    .collect();
            }
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    /// Configured relation filter as relation kinds
    pub fn relation_kinds(&self) -> Vec<RelationKind> {
        self.relations
            .iter()
            .map(|r| RelationKind::from(r.as_str()))
            .collect()
    }
}
