//! Visit aggregation.
//!
//! This module folds extracted visits, cached lookups and overrides into
//! per-venue statistics and the final summary document, and produces the
//! all-places listing used to curate overrides.

pub mod aggregate;
pub mod discover;
pub mod types;
pub mod utility;
