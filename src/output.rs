//! Output formatting and persistence.
//!
//! Writes the summary document as JSON, renders the discovery listing as a
//! text table, and exports it as CSV.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::DiscoveryReport;

const NAME_WIDTH: usize = 40;
const TYPE_WIDTH: usize = 20;

/// Serializes `value` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), "Output written");
    Ok(())
}

/// Renders the discovery listing as a fixed-width table. Places the
/// classifier flags as drinking venues are marked with `*`.
pub fn print_discovery_table<W: Write>(out: &mut W, report: &DiscoveryReport) -> Result<()> {
    writeln!(
        out,
        "{:>6}  {:>7}  {:<tw$}  {:<nw$}  PlaceID",
        "Visits",
        "Hours",
        "Type",
        "Name",
        tw = TYPE_WIDTH,
        nw = NAME_WIDTH,
    )?;
    writeln!(out, "{}", "-".repeat(120))?;

    for place in &report.places {
        let name = if place.name.is_empty() {
            "(unnamed)"
        } else {
            place.name.as_str()
        };
        let marker = if place.is_drinking_venue { " *" } else { "" };

        writeln!(
            out,
            "{:>6}  {:>7.1}  {:<tw$}  {:<nw$}  {}{}",
            place.visit_count,
            place.total_hours,
            truncate(&place.semantic_type, TYPE_WIDTH),
            truncate(name, NAME_WIDTH),
            place.place_key,
            marker,
            tw = TYPE_WIDTH,
            nw = NAME_WIDTH,
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Total unique places: {}", report.places.len())?;
    writeln!(out, "Total visits: {}", report.total_visits)?;
    writeln!(out, "Auto-detected drinking venues: {}", report.drinking_venues)?;
    writeln!(out, "\n* = auto-detected as drinking venue")?;

    Ok(())
}

/// Writes the discovery listing to a CSV file, one row per place.
pub fn write_discovery_csv(path: &Path, report: &DiscoveryReport) -> Result<()> {
    debug!(path = %path.display(), rows = report.places.len(), "Writing discovery CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for place in &report.places {
        writer.serialize(place)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = report.places.len(), "Discovery CSV written");
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
