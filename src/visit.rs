//! The canonical visit record every later stage reads.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::coords::Coords;

/// One stay at a place, normalized from whichever export schema produced it.
///
/// Visits are never modified after extraction. Any field may be empty: an
/// empty `place_id` marks an anonymous visit, and missing timestamps leave
/// `duration_hours` at zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visit {
    pub place_id: String,
    pub name: String,
    pub semantic_type: String,
    pub coords: Option<Coords>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_hours: f64,
}

impl Visit {
    /// Builds a visit, deriving `duration_hours` from the time range.
    pub fn new(
        place_id: impl Into<String>,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        coords: Option<Coords>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            semantic_type: semantic_type.into(),
            coords,
            start_time,
            end_time,
            duration_hours: duration_hours(start_time, end_time),
        }
    }
}

/// Hours between two instants, zero when either is missing or the range is
/// inverted.
pub fn duration_hours(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> f64 {
    match (start, end) {
        (Some(start), Some(end)) => {
            let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
            (seconds / 3600.0).max(0.0)
        }
        _ => 0.0,
    }
}

/// Parses an ISO-8601 timestamp and normalizes it to UTC.
///
/// Accepts a `Z` or numeric offset; a timestamp without any offset is read
/// as UTC. Returns `None` for anything unparsable.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
