//! Turns raw export segments into canonical [`Visit`] records.
//!
//! Exports have gone through several schema revisions that spell the same
//! concept under different keys. Each field is described below by an ordered
//! list of candidate key paths; the first one holding a non-empty value wins.
//! Supporting a new revision means adding a path to the relevant table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::coords::{self, Coords};
use crate::visit::{Visit, parse_timestamp};

type KeyPath = &'static [&'static str];

/// The record a timestamp path is resolved against.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Segment,
    Visit,
}

const VISIT_PAYLOAD: &[KeyPath] = &[&["visit"], &["placeVisit"]];
const PLACE: &[KeyPath] = &[&["topCandidate"], &["location"]];
const PLACE_ID: &[KeyPath] = &[&["placeId"], &["placeID"]];
const NAME: &[KeyPath] = &[&["name"], &["address"]];
const SEMANTIC_TYPE: &[KeyPath] = &[&["semanticType"], &["type"]];

/// Coordinate sources on the place record. The empty path is the place
/// record itself, which legacy exports use for inline E7 fields.
const COORDINATES: &[KeyPath] = &[&["placeLocation"], &["geo"], &[]];

const START_TIME: &[(Scope, KeyPath)] = &[
    (Scope::Segment, &["startTime"]),
    (Scope::Visit, &["startTime"]),
    (Scope::Visit, &["duration", "startTimestamp"]),
];
const END_TIME: &[(Scope, KeyPath)] = &[
    (Scope::Segment, &["endTime"]),
    (Scope::Visit, &["endTime"]),
    (Scope::Visit, &["duration", "endTimestamp"]),
];

/// Extracts every visit from `segments`, skipping segments that carry no
/// visit payload or are not JSON objects.
#[tracing::instrument(skip(segments), fields(segments = segments.len()))]
pub fn extract_visits(segments: &[Value]) -> Vec<Visit> {
    let visits: Vec<Visit> = segments.iter().filter_map(extract_visit).collect();
    info!(visits = visits.len(), "Visits extracted");
    visits
}

/// Extracts a single visit, or `None` when the segment has no usable visit
/// payload.
pub fn extract_visit(segment: &Value) -> Option<Visit> {
    if !segment.is_object() {
        debug!("Skipping non-object segment");
        return None;
    }

    let visit = first_present(segment, VISIT_PAYLOAD).filter(|v| v.is_object())?;
    let place = first_present(visit, PLACE).filter(|p| p.is_object());

    let text = |paths: &[KeyPath]| {
        place
            .and_then(|p| first_str(p, paths))
            .unwrap_or_default()
            .to_string()
    };

    let coords = place.and_then(place_coords);
    let start_time = first_timestamp(segment, visit, START_TIME);
    let end_time = first_timestamp(segment, visit, END_TIME);

    Some(Visit::new(
        text(PLACE_ID),
        text(NAME),
        text(SEMANTIC_TYPE),
        coords,
        start_time,
        end_time,
    ))
}

fn place_coords(place: &Value) -> Option<Coords> {
    COORDINATES
        .iter()
        .filter_map(|path| lookup(place, path))
        .find_map(coords_from)
}

fn coords_from(value: &Value) -> Option<Coords> {
    match value.get("latLng") {
        Some(Value::String(latlng)) => coords::parse_latlng(latlng),
        _ => coords::from_value(value),
    }
}

fn first_timestamp(
    segment: &Value,
    visit: &Value,
    candidates: &[(Scope, KeyPath)],
) -> Option<DateTime<Utc>> {
    candidates.iter().find_map(|(scope, path)| {
        let root = match scope {
            Scope::Segment => segment,
            Scope::Visit => visit,
        };
        lookup(root, path)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    })
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |value, key| value.get(*key))
        .filter(|value| is_present(value))
}

fn first_present<'a>(root: &'a Value, paths: &[KeyPath]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(root, path))
}

fn first_str<'a>(root: &'a Value, paths: &[KeyPath]) -> Option<&'a str> {
    paths
        .iter()
        .find_map(|path| lookup(root, path).and_then(Value::as_str))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}
