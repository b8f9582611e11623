//! Cache module for incremental builds
//!
//! Tracks a content hash per markdown source so a build can tell whether
//! anything changed since the previous run. Regeneration is all-or-nothing:
//! either every post page is rendered again or none are.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Source path -> content hash, persisted as a flat JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildCache {
    entries: BTreeMap<String, String>,
}

impl BuildCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load cache from disk; an absent or malformed file yields an empty cache
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str::<BuildCache>(&content) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::debug!("Ignoring malformed cache {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save cache to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    pub fn insert(&mut self, source: impl Into<String>, hash: impl Into<String>) {
        self.entries.insert(source.into(), hash.into());
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether this build's hashes differ from `previous`.
    ///
    /// True when the number of content files differs from the number of
    /// previous entries, or any hash recorded now differs from the old one.
    pub fn has_changes(&self, previous: &BuildCache, file_count: usize) -> bool {
        if previous.len() != file_count {
            tracing::debug!(
                "File count changed ({} cached, {} now)",
                previous.len(),
                file_count
            );
            return true;
        }

        self.entries.iter().any(|(source, hash)| {
            let changed = previous.get(source) != Some(hash.as_str());
            if changed {
                tracing::debug!("Content changed: {}", source);
            }
            changed
        })
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

/// Calculate a hash for a file on disk
pub fn hash_file(path: &Path) -> Result<String> {
    let content = fs::read(path)?;
    Ok(hash_content(&content))
}
