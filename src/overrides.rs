//! User-curated per-place corrections.
//!
//! Stored as a plain JSON object on disk:
//! ```json
//! {
//!   "ChIJ...": { "include": true, "name": "Joe's Wine Room", "category": "winery" },
//!   "ChIK...": { "include": false }
//! }
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::classify::Category;

/// A manual decision for one place. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Override {
    /// Forces the place in or out regardless of the classifier.
    pub include: Option<bool>,
    pub name: Option<String>,
    pub category: Option<Category>,
}

/// One override as written on disk, before the category is checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOverride {
    include: Option<bool>,
    name: Option<String>,
    category: Option<String>,
}

impl Override {
    /// Blank names and categories count as absent. An unrecognised category
    /// is logged and kept as [`Category::Other`].
    fn from_raw(place_id: &str, raw: RawOverride) -> Self {
        let category = raw
            .category
            .filter(|c| !c.trim().is_empty())
            .map(|c| {
                Category::parse(&c).unwrap_or_else(|| {
                    warn!(
                        place_id = %place_id,
                        category = %c,
                        "Unknown override category, using other"
                    );
                    Category::Other
                })
            });

        Self {
            include: raw.include,
            name: raw.name.filter(|n| !n.trim().is_empty()),
            category,
        }
    }
}

/// Overrides keyed by place identifier. Read-only to the pipeline.
#[derive(Debug, Default)]
pub struct Overrides {
    entries: HashMap<String, Override>,
}

impl Overrides {
    /// Loads overrides from a JSON file at `path`.
    ///
    /// A missing or malformed file means "no overrides".
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No overrides file");
                return Self::default();
            }
        };

        let raw: HashMap<String, RawOverride> = match serde_json::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not parse overrides, ignoring them"
                );
                return Self::default();
            }
        };

        raw.into_iter()
            .map(|(place_id, raw)| {
                let entry = Override::from_raw(&place_id, raw);
                (place_id, entry)
            })
            .collect()
    }

    /// Returns the override for `place_id`, if one is configured.
    pub fn get(&self, place_id: &str) -> Option<&Override> {
        self.entries.get(place_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Override)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (String, Override)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
