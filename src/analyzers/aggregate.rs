use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use crate::analyzers::types::{CategoryCount, MonthCount, Summary, SummaryDocument, Venue};
use crate::analyzers::utility::{extract_city, round1};
use crate::cache::{CacheEntry, PlaceCache};
use crate::classify::{classify, is_private};
use crate::coords::Coords;
use crate::overrides::Overrides;
use crate::visit::Visit;

const TOP_N: usize = 10;
const UNNAMED: &str = "(unnamed)";

/// Running totals for every visit that shares a place key.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlaceTally {
    pub name: String,
    pub semantic_type: String,
    pub coords: Option<Coords>,
    pub place_types: Vec<String>,
    pub address: String,
    pub visit_count: usize,
    pub total_hours: f64,
    pub first_visit: Option<DateTime<Utc>>,
    pub last_visit: Option<DateTime<Utc>>,
    pub visit_months: BTreeMap<String, usize>,
    /// Set once any visit carries a home or work semantic type.
    pub private: bool,
}

impl PlaceTally {
    /// Folds one visit in. Non-empty names, semantic types and coordinates
    /// replace earlier ones, so the last one seen wins.
    fn add(&mut self, visit: &Visit) {
        if !visit.name.is_empty() {
            self.name = visit.name.clone();
        }
        if !visit.semantic_type.is_empty() {
            self.semantic_type = visit.semantic_type.clone();
        }
        self.private |= is_private(&visit.semantic_type);
        if visit.coords.is_some() {
            self.coords = visit.coords;
        }

        self.visit_count += 1;
        self.total_hours += visit.duration_hours;

        if let Some(start) = visit.start_time {
            *self
                .visit_months
                .entry(start.format("%Y-%m").to_string())
                .or_default() += 1;
            self.first_visit = Some(self.first_visit.map_or(start, |t| t.min(start)));
            self.last_visit = Some(self.last_visit.map_or(start, |t| t.max(start)));
        }
    }

    /// Lets cached lookup data replace the export's own name, types and
    /// address.
    fn merge_cached(&mut self, entry: &CacheEntry) {
        if !entry.name.is_empty() {
            self.name = entry.name.clone();
        }
        if !entry.types.is_empty() {
            self.place_types = entry.types.clone();
        }
        if !entry.address.is_empty() {
            self.address = entry.address.clone();
        }
    }
}

/// Groups visits by the key `key_of` assigns them, keeping first-seen order,
/// and merges in cached lookup data for each key.
///
/// Visits for which `key_of` returns `None` are left out.
pub(crate) fn tally_places<F>(
    visits: &[Visit],
    cache: &PlaceCache,
    key_of: F,
) -> Vec<(String, PlaceTally)>
where
    F: Fn(&Visit) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut places: Vec<(String, PlaceTally)> = Vec::new();

    for visit in visits {
        let Some(key) = key_of(visit) else {
            continue;
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            places.push((key, PlaceTally::default()));
            places.len() - 1
        });
        places[slot].1.add(visit);
    }

    for (key, tally) in &mut places {
        if let Some(entry) = cache.resolved(key.as_str()) {
            tally.merge_cached(entry);
        }
    }

    places
}

/// Folds visits into the list of drinking venues, in first-seen order.
///
/// Per place, cached lookup data replaces the exported name and types, and a
/// non-empty override name replaces both before anything is classified. An
/// override's `include` then decides membership outright; without one the
/// classifier decides. An override category replaces the derived one. Places
/// with any home or work visit are always dropped, even when an override
/// asks for them.
pub fn build_venues(visits: &[Visit], overrides: &Overrides, cache: &PlaceCache) -> Vec<Venue> {
    let places = tally_places(visits, cache, |v| {
        (!v.place_id.is_empty()).then(|| v.place_id.clone())
    });

    places
        .into_iter()
        .filter_map(|(place_id, tally)| {
            let ov = overrides.get(&place_id);

            let name = ov
                .and_then(|o| o.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or(tally.name);
            let classification = classify(&name, &tally.place_types, &tally.semantic_type);

            let included = ov
                .and_then(|o| o.include)
                .unwrap_or(classification.is_drinking_venue);
            if !included {
                return None;
            }

            if tally.private {
                debug!(place_id = %place_id, "Dropping private place");
                return None;
            }

            Some(Venue {
                name: if name.is_empty() { UNNAMED.to_string() } else { name },
                category: ov
                    .and_then(|o| o.category)
                    .unwrap_or(classification.category),
                visit_count: tally.visit_count,
                total_hours: round1(tally.total_hours),
                lat: tally.coords.map_or(0.0, |c| c.lat),
                lng: tally.coords.map_or(0.0, |c| c.lng),
                first_visit: tally.first_visit,
                last_visit: tally.last_visit,
                city: extract_city(&tally.address),
                visit_months: tally.visit_months,
                place_id,
            })
        })
        .collect()
}

/// Builds the summary document for a run, stamped with the current time.
#[tracing::instrument(
    skip_all,
    fields(visits = visits.len(), overrides = overrides.len(), cache_entries = cache.len())
)]
pub fn aggregate(visits: &[Visit], overrides: &Overrides, cache: &PlaceCache) -> SummaryDocument {
    aggregate_at(visits, overrides, cache, Utc::now())
}

/// Builds the summary document with an explicit generation time. The output
/// depends only on the inputs.
pub fn aggregate_at(
    visits: &[Visit],
    overrides: &Overrides,
    cache: &PlaceCache,
    generated_at: DateTime<Utc>,
) -> SummaryDocument {
    let document = summarize(build_venues(visits, overrides, cache), generated_at);

    info!(
        venues = document.summary.total_venues,
        visits = document.summary.total_visits,
        hours = document.summary.total_hours,
        "Aggregation complete"
    );

    document
}

/// Derives rankings, breakdowns and the monthly series from a venue list.
///
/// Every sort is stable, so ties keep the order venues arrive in. That order
/// carries no meaning of its own.
pub fn summarize(mut venues: Vec<Venue>, generated_at: DateTime<Utc>) -> SummaryDocument {
    venues.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));

    let mut category_breakdown: Vec<CategoryCount> = Vec::new();
    for venue in &venues {
        match category_breakdown
            .iter_mut()
            .find(|c| c.category == venue.category)
        {
            Some(entry) => entry.count += 1,
            None => category_breakdown.push(CategoryCount {
                category: venue.category,
                count: 1,
            }),
        }
    }
    category_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    let mut months: BTreeMap<&str, usize> = BTreeMap::new();
    for venue in &venues {
        for (month, count) in &venue.visit_months {
            *months.entry(month.as_str()).or_default() += count;
        }
    }
    let visits_by_month = months
        .into_iter()
        .map(|(month, count)| MonthCount {
            month: month.to_string(),
            count,
        })
        .collect();

    let unique_cities = venues
        .iter()
        .filter(|v| !v.city.is_empty())
        .map(|v| v.city.as_str())
        .collect::<HashSet<_>>()
        .len();

    let summary = Summary {
        total_venues: venues.len(),
        total_visits: venues.iter().map(|v| v.visit_count).sum(),
        total_hours: round1(venues.iter().map(|v| v.total_hours).sum()),
        unique_cities,
        category_breakdown,
    };

    let top_by_visits = venues.iter().take(TOP_N).cloned().collect();

    let mut by_hours = venues.clone();
    by_hours.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
    by_hours.truncate(TOP_N);

    SummaryDocument {
        generated_at,
        summary,
        top_by_visits,
        top_by_hours: by_hours,
        all_venues: venues,
        visits_by_month,
    }
}
