//! Trait and types for resolving place identifiers against an external
//! lookup service.

use anyhow::Result;

use crate::cache::CacheEntry;

/// Definitive answer from the lookup service.
///
/// Transient failures (network errors, 5xx, quota) are reported as `Err`
/// from [`PlaceLookup::lookup`] instead, so they are never cached.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found {
        name: String,
        types: Vec<String>,
        address: String,
    },
    /// The identifier is unknown or deleted and will never resolve.
    NotFound,
}

impl From<LookupOutcome> for CacheEntry {
    fn from(outcome: LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found {
                name,
                types,
                address,
            } => CacheEntry::found(name, types, address),
            LookupOutcome::NotFound => CacheEntry::not_found(),
        }
    }
}

/// Abstraction over a place-details provider (e.g., Google Places).
#[async_trait::async_trait]
pub trait PlaceLookup: Send + Sync {
    /// Resolves a single place identifier.
    async fn lookup(&self, place_id: &str) -> Result<LookupOutcome>;
}
