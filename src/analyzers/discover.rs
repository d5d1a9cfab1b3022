use tracing::info;

use crate::analyzers::aggregate::tally_places;
use crate::analyzers::types::{DiscoveredPlace, DiscoveryReport};
use crate::analyzers::utility::round1;
use crate::cache::PlaceCache;
use crate::classify::classify;
use crate::visit::Visit;

/// Key used for visits that have no place identifier.
pub fn anonymous_key(visit: &Visit) -> String {
    match visit.coords {
        Some(c) => format!("unnamed_{},{}", c.lat, c.lng),
        None => "unnamed_unknown".to_string(),
    }
}

/// Lists every place in the export, including anonymous ones, so the
/// override file can be curated by hand.
///
/// Rows are sorted by visit count, most visited first; ties keep first-seen
/// order.
#[tracing::instrument(skip_all, fields(visits = visits.len()))]
pub fn discover_places(visits: &[Visit], cache: &PlaceCache) -> DiscoveryReport {
    let tallies = tally_places(visits, cache, |v| {
        Some(if v.place_id.is_empty() {
            anonymous_key(v)
        } else {
            v.place_id.clone()
        })
    });

    let mut places: Vec<DiscoveredPlace> = tallies
        .into_iter()
        .map(|(place_key, tally)| DiscoveredPlace {
            is_drinking_venue: classify(&tally.name, &tally.place_types, &tally.semantic_type)
                .is_drinking_venue,
            place_key,
            visit_count: tally.visit_count,
            total_hours: round1(tally.total_hours),
            semantic_type: tally.semantic_type,
            name: tally.name,
        })
        .collect();

    places.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));

    let report = DiscoveryReport {
        total_visits: places.iter().map(|p| p.visit_count).sum(),
        drinking_venues: places.iter().filter(|p| p.is_drinking_venue).count(),
        places,
    };

    info!(
        unique_places = report.places.len(),
        total_visits = report.total_visits,
        drinking_venues = report.drinking_venues,
        "Discovery complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use crate::coords::Coords;

    fn visit(pid: &str, name: &str, coords: Option<Coords>) -> Visit {
        Visit::new(pid, name, "", coords, None, None)
    }

    #[test]
    fn test_discover_lists_every_place() {
        let mut cache = PlaceCache::new("unused.json");
        cache.put("P2", CacheEntry::found("Fremont Brewing", vec![], ""));

        let visits = vec![
            visit("P1", "Hardware Store", None),
            visit("P2", "", None),
            visit("P2", "", None),
            visit("", "", Some(Coords::new(47.5, -122.25))),
            visit("", "", None),
            visit("", "", Some(Coords::new(47.5, -122.25))),
        ];

        let report = discover_places(&visits, &cache);

        let keys: Vec<&str> = report.places.iter().map(|p| p.place_key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["P2", "unnamed_47.5,-122.25", "P1", "unnamed_unknown"]
        );
        assert_eq!(report.total_visits, 6);
        assert_eq!(report.drinking_venues, 1);
        assert_eq!(report.places[0].name, "Fremont Brewing");
        assert!(report.places[0].is_drinking_venue);
    }

    #[test]
    fn test_discover_empty() {
        let report = discover_places(&[], &PlaceCache::new("unused.json"));
        assert!(report.places.is_empty());
        assert_eq!(report.total_visits, 0);
    }
}
