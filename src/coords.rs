//! Coordinate parsing for the many lat/lng encodings found in timeline exports.

use serde_json::Value;

/// Characters the exports use as a degree suffix.
const DEGREE_SIGNS: &[char] = &['\u{00B0}', '\u{02DA}', '\u{00BA}'];

/// Integer fields above this magnitude are E7 fixed-point degrees.
const E7_THRESHOLD: i64 = 1000;
const E7_SCALE: f64 = 1e7;

/// A canonical latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Parses a free-form coordinate string.
///
/// Handles `geo:` URIs, degree-suffixed pairs (`"47.6553°, -122.3035°"`) and
/// plain comma-separated pairs. Anything else, including a string with fewer
/// than two numeric components, yields `None`.
pub fn parse_latlng(raw: &str) -> Option<Coords> {
    let s = raw.trim();
    let s = s.strip_prefix("geo:").unwrap_or(s);
    let cleaned: String = s.chars().filter(|c| !DEGREE_SIGNS.contains(c)).collect();

    let mut parts = cleaned.split(',').map(str::trim);
    let lat = parse_degrees(parts.next()?)?;
    let lng = parse_degrees(parts.next()?)?;

    Some(Coords::new(lat, lng))
}

/// Builds coordinates from separate latitude/longitude JSON fields.
///
/// Integer values whose magnitude exceeds 1000 are treated as E7 fixed-point
/// and scaled down; anything else is read as plain degrees.
pub fn from_fields(lat: &Value, lng: &Value) -> Option<Coords> {
    if let (Some(lat_e7), Some(lng_e7)) = (lat.as_i64(), lng.as_i64()) {
        if lat_e7.abs() > E7_THRESHOLD || lng_e7.abs() > E7_THRESHOLD {
            return Some(Coords::new(
                lat_e7 as f64 / E7_SCALE,
                lng_e7 as f64 / E7_SCALE,
            ));
        }
    }

    Some(Coords::new(field_degrees(lat)?, field_degrees(lng)?))
}

/// Reads a coordinate out of a JSON value that is either a string or an
/// object with `latitudeE7`/`longitudeE7` or `lat`/`lng` members.
pub fn from_value(value: &Value) -> Option<Coords> {
    match value {
        Value::String(s) => parse_latlng(s),
        Value::Object(map) => {
            let lat = map.get("latitudeE7").or_else(|| map.get("lat"))?;
            let lng = map.get("longitudeE7").or_else(|| map.get("lng"))?;
            from_fields(lat, lng)
        }
        _ => None,
    }
}

fn parse_degrees(part: &str) -> Option<f64> {
    part.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn field_degrees(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_degrees(s.trim()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assert_close(c: Coords, lat: f64, lng: f64) {
        assert!((c.lat - lat).abs() < 1e-9, "lat {} != {}", c.lat, lat);
        assert!((c.lng - lng).abs() < 1e-9, "lng {} != {}", c.lng, lng);
    }

    #[test]
    fn test_parse_degree_suffixed_pair() {
        let c = parse_latlng("47.6553351°, -122.3035199°").unwrap();
        assert_close(c, 47.6553351, -122.3035199);
    }

    #[test]
    fn test_parse_geo_uri() {
        let c = parse_latlng("geo:47.65,-122.30").unwrap();
        assert_close(c, 47.65, -122.30);
    }

    #[test]
    fn test_parse_plain_pair_with_whitespace() {
        let c = parse_latlng("  47.65 ,  -122.30 ").unwrap();
        assert_close(c, 47.65, -122.30);
    }

    #[test]
    fn test_parse_ignores_trailing_components() {
        let c = parse_latlng("geo:47.65,-122.30,12").unwrap();
        assert_close(c, 47.65, -122.30);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_latlng("").is_none());
        assert!(parse_latlng("47.65").is_none());
        assert!(parse_latlng("north, west").is_none());
        assert!(parse_latlng("47.65, ").is_none());
        assert!(parse_latlng("geo:").is_none());
        assert!(parse_latlng("NaN, 1.0").is_none());
    }

    #[test]
    fn test_e7_fields_are_scaled() {
        let c = from_fields(&json!(476553351), &json!(-1223035199)).unwrap();
        assert_close(c, 47.6553351, -122.3035199);
    }

    #[test]
    fn test_plain_float_fields_are_not_scaled() {
        let c = from_fields(&json!(47.65), &json!(-122.3)).unwrap();
        assert_close(c, 47.65, -122.3);

        let small_ints = from_fields(&json!(47), &json!(-122)).unwrap();
        assert_close(small_ints, 47.0, -122.0);
    }

    #[test]
    fn test_from_value_object_forms() {
        let e7 = from_value(&json!({"latitudeE7": 476553351, "longitudeE7": -1223035199})).unwrap();
        assert_close(e7, 47.6553351, -122.3035199);

        let plain = from_value(&json!({"lat": 47.65, "lng": -122.3})).unwrap();
        assert_close(plain, 47.65, -122.3);

        let strings = from_value(&json!({"lat": "47.65", "lng": "-122.3"})).unwrap();
        assert_close(strings, 47.65, -122.3);
    }

    #[test]
    fn test_from_value_missing_or_invalid() {
        assert!(from_value(&json!({"lat": 47.65})).is_none());
        assert!(from_value(&json!({"lat": "x", "lng": "y"})).is_none());
        assert!(from_value(&json!(42)).is_none());
        assert!(from_value(&Value::Null).is_none());
    }
}
