//! Durable cache of place lookups.
//!
//! Stored as a pretty-printed JSON object on disk:
//! ```json
//! {
//!   "ChIJ...": { "name": "Fremont Brewing", "types": ["brewery", "bar"], "address": "..." },
//!   "ChIK...": { "name": "", "types": [], "address": "", "not_found": true }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the lookup service returned for one place identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheEntry {
    pub name: String,
    pub types: Vec<String>,
    pub address: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub not_found: bool,
}

impl CacheEntry {
    pub fn found(name: impl Into<String>, types: Vec<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types,
            address: address.into(),
            not_found: false,
        }
    }

    /// A permanent negative result, cached so the identifier is never retried.
    pub fn not_found() -> Self {
        Self {
            not_found: true,
            ..Default::default()
        }
    }
}

/// Place lookups keyed by identifier, loaded once per run and flushed back to
/// `path` on demand.
#[derive(Debug, Default)]
pub struct PlaceCache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl PlaceCache {
    /// An empty cache that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Loads the cache from `path`. A missing file is an empty cache; a
    /// corrupt one is logged and also treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    path = %path.display(),
                    error = %e,
                    "No place cache on disk, starting empty"
                );
                return Self::new(path);
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Self { path, entries },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Place cache is corrupt, starting empty");
                Self::new(path)
            }
        }
    }

    /// Writes the cache to disk, creating parent directories as needed.
    ///
    /// The file is replaced atomically so an interrupted save never leaves a
    /// truncated cache behind.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating cache directory {}", parent.display()))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "Place cache saved");
        Ok(())
    }

    pub fn get(&self, place_id: &str) -> Option<&CacheEntry> {
        self.entries.get(place_id)
    }

    /// Returns the entry only when it holds a positive lookup result.
    pub fn resolved(&self, place_id: &str) -> Option<&CacheEntry> {
        self.get(place_id).filter(|entry| !entry.not_found)
    }

    pub fn contains(&self, place_id: &str) -> bool {
        self.entries.contains_key(place_id)
    }

    pub fn put(&mut self, place_id: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(place_id.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PlaceCache::load(dir.path().join("place-cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("place-cache.json");
        fs::write(&path, "{ truncated").unwrap();

        let cache = PlaceCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_negative_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("place-cache.json");

        let mut cache = PlaceCache::new(&path);
        cache.put(
            "P1",
            CacheEntry::found("Fremont Brewing", vec!["brewery".into()], "Seattle"),
        );
        cache.put("P2", CacheEntry::not_found());
        cache.save().unwrap();

        let reloaded = PlaceCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("P1").unwrap().name, "Fremont Brewing");
        assert!(reloaded.contains("P2"));
        assert!(reloaded.get("P2").unwrap().not_found);
        assert!(reloaded.resolved("P2").is_none());
        assert!(reloaded.resolved("P1").is_some());
    }

    #[test]
    fn test_not_found_flag_only_written_when_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("place-cache.json");

        let mut cache = PlaceCache::new(&path);
        cache.put("P1", CacheEntry::found("A", vec![], ""));
        cache.save().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("not_found"));
    }

    #[test]
    fn test_entries_with_missing_fields_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("place-cache.json");
        fs::write(&path, r#"{"P1": {"name": "Stoup"}, "P2": {"not_found": true}}"#).unwrap();

        let cache = PlaceCache::load(&path);
        assert_eq!(cache.get("P1").unwrap().name, "Stoup");
        assert!(cache.get("P1").unwrap().types.is_empty());
        assert!(cache.get("P2").unwrap().not_found);
    }
}
