//! JSON parser for location-history export files.

use anyhow::Result;
use serde_json::Value;

/// Top-level keys under which exports nest their segment lists.
const SEGMENT_LIST_KEYS: &[&str] = &["semanticSegments", "timelineObjects"];

/// Decodes an export file into its flat list of raw segments.
///
/// A file is either a bare list of segments or an object carrying one or
/// both of the recognized segment-list keys. Any other top-level shape
/// yields an empty list.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON.
pub fn parse_export(bytes: &[u8]) -> Result<Vec<Value>> {
    let data: Value = serde_json::from_slice(bytes)?;

    let segments = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => SEGMENT_LIST_KEYS
            .iter()
            .filter_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .flatten()
            .collect(),
        _ => Vec::new(),
    };

    Ok(segments)
}
