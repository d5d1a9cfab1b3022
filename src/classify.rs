//! Decides whether a place is a drinking venue and what kind.
//!
//! Everything here is a pure function of the place's name, the lookup
//! service's type tags and the export's own semantic type.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Name fragments long enough to match safely as plain substrings.
const DRINK_SUBSTRINGS: &[&str] = &[
    "brewery",
    "brewing",
    "brewhouse",
    "brew pub",
    "brewpub",
    "taproom",
    "tap room",
    "tap house",
    "taphouse",
    "alehouse",
    "ale house",
    "tavern",
    "saloon",
    "cocktail",
    "winery",
    "vineyard",
    "wine bar",
    "wine cellar",
    "distillery",
    "moonshine",
    "cidery",
    "cider house",
    "ciderhouse",
    "beer garden",
    "biergarten",
    "beer hall",
];

/// Lookup-service type tags that mark a drinking venue.
const DRINK_PLACE_TYPES: &[&str] = &[
    "bar",
    "night_club",
    "brewery",
    "wine_bar",
    "winery",
    "distillery",
];

/// Export semantic types that mark a drinking venue.
const DRINK_SEMANTIC_TYPES: &[&str] = &[
    "TYPE_BAR",
    "TYPE_BREWERY",
    "TYPE_WINE_BAR",
    "TYPE_NIGHT_CLUB",
    "TYPE_PUB",
    "TYPE_WINERY",
    "TYPE_DISTILLERY",
];

/// Export semantic types for private places. These are never looked up and
/// never reported.
pub const PRIVATE_SEMANTIC_TYPES: &[&str] = &["HOME", "INFERRED_HOME", "WORK", "INFERRED_WORK"];

/// Short, ambiguous words that only count as whole words.
static DRINK_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bars?|pubs?|lounge|spirits)\b").expect("invalid drink word regex")
});

/// Names that contain "bar" and friends without being bars.
static FALSE_POSITIVES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)barber|bartell|barnes|barn\b|botanical|embassy")
        .expect("invalid exclusion regex")
});

static VILLAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)village").expect("invalid village regex"));
static DRINK_AFTER_VILLAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)bar|pub|brew").expect("invalid village suffix regex"));

const BREWERY_PATTERN: &str = concat!(
    r"brew|taproom|tap room|tap house|taphouse|alehouse|ale house",
    r"|beer garden|biergarten|beer hall",
);

/// Ordered name patterns for categorization. Order matters: "Wine Bar" must
/// hit the winery pattern before the generic bar pattern sees it.
static CATEGORY_PATTERNS: LazyLock<Vec<(Regex, Category)>> = LazyLock::new(|| {
    [
        (BREWERY_PATTERN, Category::Brewery),
        (r"winery|vineyard|wine bar|wine cellar", Category::Winery),
        (r"distillery|spirits|moonshine", Category::Distillery),
        (r"cidery|cider house|ciderhouse", Category::Cidery),
        (r"bar|pub|tavern|saloon|lounge|cocktail|night.?club", Category::Bar),
    ]
    .into_iter()
    .map(|(pattern, category)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("invalid category regex");
        (re, category)
    })
    .collect()
});

/// Venue category reported in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Brewery,
    Winery,
    Distillery,
    Cidery,
    Bar,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Brewery => "brewery",
            Category::Winery => "winery",
            Category::Distillery => "distillery",
            Category::Cidery => "cidery",
            Category::Bar => "bar",
            Category::Other => "other",
        }
    }

    /// Parses a category name, ignoring case and surrounding whitespace.
    /// Returns `None` for anything that is not one of the known categories.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "brewery" => Some(Category::Brewery),
            "winery" => Some(Category::Winery),
            "distillery" => Some(Category::Distillery),
            "cidery" => Some(Category::Cidery),
            "bar" => Some(Category::Bar),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_drinking_venue: bool,
    pub category: Category,
}

/// Classifies a place in one call.
pub fn classify(name: &str, place_types: &[String], semantic_type: &str) -> Classification {
    Classification {
        is_drinking_venue: is_drinking_venue(name, place_types, semantic_type),
        category: categorize(name, place_types, semantic_type),
    }
}

/// Returns `true` when the place looks like a drinking venue.
///
/// A false-positive name rejects the place outright, before any other signal
/// is consulted.
pub fn is_drinking_venue(name: &str, place_types: &[String], semantic_type: &str) -> bool {
    if is_false_positive(name) {
        return false;
    }

    let lower = name.to_lowercase();
    if DRINK_SUBSTRINGS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }

    if DRINK_WORDS.is_match(name) {
        return true;
    }

    if place_types
        .iter()
        .any(|t| DRINK_PLACE_TYPES.contains(&t.as_str()))
    {
        return true;
    }

    DRINK_SEMANTIC_TYPES.contains(&semantic_type.to_uppercase().as_str())
}

/// Assigns a category from the name, then the lookup types, then the
/// semantic type. Falls back to [`Category::Other`].
pub fn categorize(name: &str, place_types: &[String], semantic_type: &str) -> Category {
    if let Some((_, category)) = CATEGORY_PATTERNS.iter().find(|(re, _)| re.is_match(name)) {
        return *category;
    }

    for t in place_types {
        if t.contains("brew") {
            return Category::Brewery;
        }
        if t.contains("wine") {
            return Category::Winery;
        }
        if t.contains("distill") {
            return Category::Distillery;
        }
        if t == "bar" || t == "night_club" {
            return Category::Bar;
        }
    }

    let st = semantic_type.to_uppercase();
    if st.contains("BREW") {
        Category::Brewery
    } else if st.contains("WINE") {
        Category::Winery
    } else if st.contains("DISTILL") {
        Category::Distillery
    } else if st.contains("BAR") || st.contains("PUB") || st.contains("NIGHT") {
        Category::Bar
    } else {
        Category::Other
    }
}

/// Returns `true` for home and work places.
pub fn is_private(semantic_type: &str) -> bool {
    PRIVATE_SEMANTIC_TYPES.contains(&semantic_type)
}

/// Matches names such as "Barbershop", "Botanical Garden" or a "Village"
/// with no drink word after it.
fn is_false_positive(name: &str) -> bool {
    if FALSE_POSITIVES.is_match(name) {
        return true;
    }

    VILLAGE.find_iter(name).any(|m| {
        let rest = &name[m.end()..];
        !(rest.starts_with(' ') && DRINK_AFTER_VILLAGE.is_match(&rest[1..]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_substring_keywords() {
        assert!(is_drinking_venue("Fremont Brewing", &[], ""));
        assert!(is_drinking_venue("The Pine Box Taproom", &[], ""));
        assert!(is_drinking_venue("Rolling Hills Vineyard", &[], ""));
    }

    #[test]
    fn test_short_words_need_word_boundaries() {
        assert!(is_drinking_venue("Jupiter Bar", &[], ""));
        assert!(is_drinking_venue("The Pub at Third", &[], ""));
        assert!(is_drinking_venue("Hotel Lounge", &[], ""));
        assert!(is_drinking_venue("Copperworks Spirits", &[], ""));

        assert!(!is_drinking_venue("Barrel Fitness", &[], ""));
        assert!(!is_drinking_venue("Public Library", &[], ""));
        assert!(!is_drinking_venue("Crowbar Hardware", &[], ""));
    }

    #[test]
    fn test_exclusion_guard_beats_every_signal() {
        assert!(!is_drinking_venue("City Barbershop", &[], ""));
        assert!(!is_drinking_venue(
            "Barbershop Brewing Supply",
            &types(&["bar"]),
            "TYPE_BAR"
        ));
        assert!(!is_drinking_venue("Bartell Drugs", &[], ""));
        assert!(!is_drinking_venue("Volunteer Park Botanical Lounge", &[], ""));
        assert!(!is_drinking_venue("Red Barn", &[], ""));
    }

    #[test]
    fn test_village_needs_trailing_drink_word() {
        assert!(!is_drinking_venue("University Village", &types(&["bar"]), ""));
        assert!(is_drinking_venue("Village Pub", &[], ""));
        assert!(is_drinking_venue("Greenwood Village Brewing", &[], ""));
        assert!(!is_drinking_venue("Village Lounge", &[], ""));
    }

    #[test]
    fn test_external_and_semantic_types() {
        assert!(is_drinking_venue("Joe's", &types(&["restaurant", "night_club"]), ""));
        assert!(!is_drinking_venue("Joe's", &types(&["restaurant"]), ""));
        assert!(is_drinking_venue("", &[], "TYPE_WINE_BAR"));
        assert!(is_drinking_venue("", &[], "type_pub"));
        assert!(!is_drinking_venue("", &[], "HOME"));
        assert!(!is_drinking_venue("", &[], ""));
    }

    #[test]
    fn test_category_order_wine_bar_is_winery() {
        assert_eq!(categorize("City Wine Bar", &[], ""), Category::Winery);
        assert_eq!(categorize("Brewery Bar & Grill", &[], ""), Category::Brewery);
        assert_eq!(categorize("Westland Spirits", &[], ""), Category::Distillery);
        assert_eq!(categorize("Schilling Cider House", &[], ""), Category::Cidery);
        assert_eq!(categorize("Nectar Lounge", &[], ""), Category::Bar);
        assert_eq!(categorize("Q Nightclub", &[], ""), Category::Bar);
    }

    #[test]
    fn test_category_falls_back_to_types_then_semantic() {
        assert_eq!(categorize("Joe's", &types(&["brewery"]), ""), Category::Brewery);
        assert_eq!(categorize("Joe's", &types(&["wine_bar"]), ""), Category::Winery);
        assert_eq!(categorize("Joe's", &types(&["night_club"]), ""), Category::Bar);
        assert_eq!(categorize("Joe's", &[], "TYPE_DISTILLERY"), Category::Distillery);
        assert_eq!(categorize("Joe's", &[], "TYPE_PUB"), Category::Bar);
        assert_eq!(categorize("Joe's", &types(&["cafe"]), "UNKNOWN"), Category::Other);
    }

    #[test]
    fn test_classify_is_pure() {
        let tags = types(&["bar"]);
        let first = classify("City Wine Bar", &tags, "TYPE_BAR");
        let second = classify("City Wine Bar", &tags, "TYPE_BAR");

        assert_eq!(first, second);
        assert!(first.is_drinking_venue);
        assert_eq!(first.category, Category::Winery);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse(" Winery "), Some(Category::Winery));
        assert_eq!(Category::parse("other"), Some(Category::Other));
        assert_eq!(Category::parse("speakeasy"), None);
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::Cidery.to_string(), "cidery");
    }

    #[test]
    fn test_is_private() {
        assert!(is_private("HOME"));
        assert!(is_private("INFERRED_WORK"));
        assert!(!is_private("TYPE_BAR"));
        assert!(!is_private(""));
    }
}
