//! Content-addressed cache of built graphs
//!
//! A graph is built once per distinct script text. Entries are keyed by the
//! BLAKE3 hash of the script and handed out as `Arc`s so callers can hold on
//! to a graph after it has been evicted.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::graph::CurriculumGraph;
use crate::model::ParsedModel;
use crate::parser::parse;
use crate::source::load_script;

/// BLAKE3 hash of a script's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of(script: &str) -> Self {
        Self(*blake3::hash(script.as_bytes()).as_bytes())
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A parsed script and the graph built from it
#[derive(Debug)]
pub struct LoadedScript {
    pub hash: ContentHash,
    pub model: ParsedModel,
    pub graph: CurriculumGraph,
}

impl LoadedScript {
    pub fn from_script(script: &str) -> Self {
        let model = parse(script);
        let graph = CurriculumGraph::from_model(&model);
        Self {
            hash: ContentHash::of(script),
            model,
            graph,
        }
    }
}

/// Graph cache with caller-controlled eviction
#[derive(Debug, Default)]
pub struct GraphCache {
    entries: HashMap<ContentHash, Arc<LoadedScript>>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached build of `script`, building it on a miss
    pub fn get_or_load(&mut self, script: &str) -> Arc<LoadedScript> {
        let hash = ContentHash::of(script);
        if let Some(entry) = self.entries.get(&hash) {
            tracing::debug!("Graph cache hit for {}", hash);
            return Arc::clone(entry);
        }

        tracing::debug!("Graph cache miss for {}, building", hash);
        let entry = Arc::new(LoadedScript::from_script(script));
        self.entries.insert(hash, Arc::clone(&entry));
        entry
    }

    /// Read a script file and return its cached build
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<LoadedScript>> {
        let script = load_script(path)?;
        Ok(self.get_or_load(&script))
    }

    pub fn get(&self, hash: &ContentHash) -> Option<Arc<LoadedScript>> {
        self.entries.get(hash).cloned()
    }

    /// Drop one entry; returns whether it was present
    pub fn evict(&mut self, hash: &ContentHash) -> bool {
        let removed = self.entries.remove(hash).is_some();
        if removed {
            tracing::debug!("Evicted graph {}", hash);
        }
        removed
    }

    pub fn clear(&mut self) {
        tracing::debug!("Clearing {} cached graphs", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
