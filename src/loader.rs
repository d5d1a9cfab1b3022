//! Reads a directory of export files into one flat segment list.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::parser::parse_export;

/// Loads every `*.json` file in `input_dir`, in file-name order, and returns
/// the concatenation of their segments.
///
/// Unreadable or unparsable files are skipped with a warning. A missing
/// directory yields an empty list.
#[tracing::instrument(skip_all, fields(input_dir = %input_dir.display()))]
pub fn load_segments(input_dir: &Path) -> Vec<Value> {
    let files = match export_files(input_dir) {
        Ok(files) => files,
        Err(e) => {
            warn!(error = %e, "Input directory not readable, no segments loaded");
            return Vec::new();
        }
    };

    let mut segments = Vec::new();

    for path in files {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unreadable export file");
                continue;
            }
        };

        match parse_export(&bytes) {
            Ok(parsed) => {
                debug!(file = %path.display(), segments = parsed.len(), "Export file parsed");
                segments.extend(parsed);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unparsable export file");
            }
        }
    }

    info!(segments = segments.len(), "Segments loaded");
    segments
}

fn export_files(input_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
