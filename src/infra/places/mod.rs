//! Google Places (New) implementation of
//! [`PlaceLookup`](crate::services::place_lookup::PlaceLookup).

mod client;

pub use client::GooglePlacesClient;
