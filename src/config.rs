//! Run-time settings: default paths, credentials and resolution pacing.

use anyhow::{Result, bail};
use std::time::Duration;

pub const DEFAULT_INPUT_DIR: &str = "raw-data/timeline/";
pub const DEFAULT_CACHE_PATH: &str = "data/place-cache.json";
pub const DEFAULT_OVERRIDES_PATH: &str = "data/venue-overrides.json";
pub const DEFAULT_OUTPUT_PATH: &str = "data/brewery-data.json";
pub const DEFAULT_LOG_FILE: &str = "logs/venue_ledger.log";

pub const API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";

/// Picks the lookup credential from the command line, falling back to the
/// environment (which `.env` has already been merged into).
///
/// # Errors
///
/// Fails when neither source provides a non-empty key.
pub fn resolve_api_key(cli_key: Option<String>) -> Result<String> {
    let key = cli_key
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    match key {
        Some(key) => Ok(key),
        None => bail!("No API key. Use --api-key or set {API_KEY_ENV}"),
    }
}

/// Pacing for cache population.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Pause after every definitive (found / not found) lookup.
    pub throttle: Duration,
    /// Pause after every transient failure.
    pub backoff: Duration,
    /// Save the cache after this many definitive lookups.
    pub flush_every: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(100),
            backoff: Duration::from_millis(500),
            flush_every: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_key_wins() {
        assert_eq!(resolve_api_key(Some("abc".into())).unwrap(), "abc");
        assert_eq!(resolve_api_key(Some("  abc \n".into())).unwrap(), "abc");
    }

    #[test]
    fn test_default_pacing() {
        let opts = ResolveOptions::default();
        assert_eq!(opts.throttle, Duration::from_millis(100));
        assert_eq!(opts.backoff, Duration::from_millis(500));
        assert_eq!(opts.flush_every, 100);
    }
}
