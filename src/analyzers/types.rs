//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::classify::Category;

/// One drinking venue with everything its visits add up to.
#[derive(Debug, Clone, Serialize)]
pub struct Venue {
    #[serde(skip)]
    pub place_id: String,
    pub name: String,
    pub category: Category,
    pub visit_count: usize,
    pub total_hours: f64,
    pub lat: f64,
    pub lng: f64,
    #[serde(serialize_with = "date_or_empty")]
    pub first_visit: Option<DateTime<Utc>>,
    #[serde(serialize_with = "date_or_empty")]
    pub last_visit: Option<DateTime<Utc>>,
    pub city: String,
    /// Visit counts keyed by `YYYY-MM`.
    #[serde(skip)]
    pub visit_months: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: usize,
}

/// Headline numbers across all venues.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_venues: usize,
    pub total_visits: usize,
    pub total_hours: f64,
    pub unique_cities: usize,
    pub category_breakdown: Vec<CategoryCount>,
}

/// The complete output document, written as `brewery-data.json`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryDocument {
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub top_by_visits: Vec<Venue>,
    pub top_by_hours: Vec<Venue>,
    pub all_venues: Vec<Venue>,
    pub visits_by_month: Vec<MonthCount>,
}

/// One row of the discovery listing.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredPlace {
    pub place_key: String,
    pub visit_count: usize,
    pub total_hours: f64,
    pub semantic_type: String,
    pub name: String,
    pub is_drinking_venue: bool,
}

/// Every place in the export, most visited first.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    pub places: Vec<DiscoveredPlace>,
    pub total_visits: usize,
    pub drinking_venues: usize,
}

fn date_or_empty<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => s.collect_str(&ts.format("%Y-%m-%d")),
        None => s.serialize_str(""),
    }
}
