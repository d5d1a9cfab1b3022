use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid digits regex"));

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Pulls the city out of a formatted address such as
/// `"1158 Broadway, Seattle, WA 98122, USA"`.
///
/// Takes the third-to-last comma-separated component, or the second-to-last
/// when there are only two (or the third-to-last is nothing but digits),
/// with ZIP-like digit runs removed. Returns an empty string otherwise.
pub fn extract_city(address: &str) -> String {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();

    let candidates = [
        parts.len().checked_sub(3).map(|i| parts[i]),
        parts.len().checked_sub(2).map(|i| parts[i]),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|part| DIGITS.replace_all(part, "").trim().to_string())
        .find(|city| !city.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.46), 3.5);
        assert_eq!(round1(3.44), 3.4);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(12.0), 12.0);
    }

    #[test]
    fn test_extract_city_full_address() {
        assert_eq!(extract_city("1158 Broadway, Seattle, WA 98122, USA"), "Seattle");
        assert_eq!(
            extract_city("3409 Woodland Park Ave N, Seattle, WA 98103, USA"),
            "Seattle"
        );
    }

    #[test]
    fn test_extract_city_strips_zip() {
        assert_eq!(extract_city("Main St, 97201 Portland, OR, USA"), "Portland");
    }

    #[test]
    fn test_extract_city_short_addresses() {
        assert_eq!(extract_city("Walla Walla, USA"), "Walla Walla");
        assert_eq!(extract_city("98122, WA, USA"), "WA");
        assert_eq!(extract_city("USA"), "");
        assert_eq!(extract_city(""), "");
    }
}
