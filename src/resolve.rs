//! Populates the place cache from the external lookup service.
//!
//! Lookups run one at a time with a fixed pause between them. Definitive
//! answers (found or not found) are cached; transient failures are logged
//! and left for the next run.

use anyhow::Result;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::cache::PlaceCache;
use crate::classify::is_private;
use crate::config::ResolveOptions;
use crate::services::place_lookup::{LookupOutcome, PlaceLookup};
use crate::visit::Visit;

/// Counters for one resolution pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    /// Visits whose place was already in the cache before the pass.
    pub already_cached_visits: usize,
    /// Uncached places never queried because they are home or work.
    pub skipped_private: usize,
    pub queued: usize,
    pub resolved: usize,
    pub not_found: usize,
    pub failed: usize,
}

/// Place identifiers that still need a lookup, in first-seen order.
///
/// A place is left out when it is already cached, or when any of its visits
/// carries a home/work semantic type.
pub fn pending_place_ids(visits: &[Visit], cache: &PlaceCache) -> (Vec<String>, usize) {
    let private: HashSet<&str> = visits
        .iter()
        .filter(|v| is_private(&v.semantic_type))
        .map(|v| v.place_id.as_str())
        .collect();

    let mut seen = HashSet::new();
    let mut pending = Vec::new();
    let mut skipped_private = 0;

    for visit in visits {
        let pid = visit.place_id.as_str();
        if pid.is_empty() || cache.contains(pid) || !seen.insert(pid) {
            continue;
        }

        if private.contains(pid) {
            skipped_private += 1;
        } else {
            pending.push(pid.to_string());
        }
    }

    (pending, skipped_private)
}

/// Looks up every pending place and records the answers in `cache`.
///
/// The cache is saved every `opts.flush_every` definitive answers and once
/// more at the end, so an interrupted run loses at most one batch.
///
/// # Errors
///
/// Only cache write failures are errors; lookup failures are counted.
#[tracing::instrument(skip_all, fields(visits = visits.len(), cached = cache.len()))]
pub async fn resolve_places<L: PlaceLookup + ?Sized>(
    visits: &[Visit],
    cache: &mut PlaceCache,
    lookup: &L,
    opts: &ResolveOptions,
) -> Result<ResolveReport> {
    let (pending, skipped_private) = pending_place_ids(visits, cache);

    let mut report = ResolveReport {
        already_cached_visits: visits.iter().filter(|v| cache.contains(&v.place_id)).count(),
        skipped_private,
        queued: pending.len(),
        ..Default::default()
    };

    info!(
        cache_entries = cache.len(),
        already_cached_visits = report.already_cached_visits,
        queued = report.queued,
        skipped_private,
        "Starting place resolution"
    );

    if pending.is_empty() {
        info!("All places already resolved");
        return Ok(report);
    }

    for (i, place_id) in pending.iter().enumerate() {
        if i == 0 || (i + 1) % 50 == 0 {
            info!(
                progress = i + 1,
                total = report.queued,
                resolved = report.resolved,
                not_found = report.not_found,
                failed = report.failed,
                "Resolving places"
            );
        }

        let outcome = match lookup.lookup(place_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(place_id = %place_id, error = %e, "Place lookup failed, will retry next run");
                report.failed += 1;
                tokio::time::sleep(opts.backoff).await;
                continue;
            }
        };

        match outcome {
            LookupOutcome::NotFound => report.not_found += 1,
            LookupOutcome::Found { .. } => report.resolved += 1,
        }
        cache.put(place_id.clone(), outcome.into());

        let done = report.resolved + report.not_found;
        if opts.flush_every > 0 && done % opts.flush_every == 0 {
            cache.save()?;
        }

        tokio::time::sleep(opts.throttle).await;
    }

    cache.save()?;

    info!(
        resolved = report.resolved,
        not_found = report.not_found,
        failed = report.failed,
        cache_entries = cache.len(),
        "Resolution complete"
    );

    Ok(report)
}
