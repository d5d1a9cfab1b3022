use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, fetch};
use crate::services::place_lookup::{LookupOutcome, PlaceLookup};

const BASE_URL: &str = "https://places.googleapis.com/v1/places";
const FIELD_MASK: &str = "displayName,types,formattedAddress";
const TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlaceDetails {
    display_name: Option<LocalizedText>,
    types: Vec<String>,
    formatted_address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocalizedText {
    text: String,
}

pub struct GooglePlacesClient {
    base_url: String,
    http: ApiKey<BasicClient>,
}

impl GooglePlacesClient {
    pub fn new(api_key: &str) -> Result<Self> {
        let http = ApiKey::new(BasicClient::with_timeout(TIMEOUT)?, "X-Goog-Api-Key", api_key)?;

        Ok(Self {
            base_url: BASE_URL.to_string(),
            http,
        })
    }
}

/// Maps a place-details response body onto a [`LookupOutcome::Found`].
fn parse_details(body: &[u8]) -> Result<LookupOutcome> {
    let details: PlaceDetails = serde_json::from_slice(body)
        .map_err(|e| anyhow::anyhow!("Failed to parse place details: {}", e))?;

    Ok(LookupOutcome::Found {
        name: details.display_name.map(|d| d.text).unwrap_or_default(),
        types: details.types,
        address: details.formatted_address,
    })
}

#[async_trait]
impl PlaceLookup for GooglePlacesClient {
    async fn lookup(&self, place_id: &str) -> Result<LookupOutcome> {
        let url = format!("{}/{}", self.base_url, place_id);

        let response = fetch(&self.http, &url, &[("X-Goog-FieldMask", FIELD_MASK)])
            .await
            .map_err(|e| anyhow::anyhow!("Network error for {}: {}", place_id, e))?;

        if response.status == StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }

        if !response.status.is_success() {
            return Err(anyhow::anyhow!(
                "API error {} for {}: {}",
                response.status,
                place_id,
                response.body_snippet(ERROR_BODY_CHARS)
            ));
        }

        parse_details(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_details() {
        let body = br#"{
            "displayName": {"text": "Fremont Brewing", "languageCode": "en"},
            "types": ["brewery", "bar", "point_of_interest"],
            "formattedAddress": "3409 Woodland Park Ave N, Seattle, WA 98103, USA"
        }"#;

        let outcome = parse_details(body).unwrap();

        assert_eq!(
            outcome,
            LookupOutcome::Found {
                name: "Fremont Brewing".to_string(),
                types: vec!["brewery".into(), "bar".into(), "point_of_interest".into()],
                address: "3409 Woodland Park Ave N, Seattle, WA 98103, USA".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_sparse_details() {
        let outcome = parse_details(b"{}").unwrap();
        assert_eq!(
            outcome,
            LookupOutcome::Found {
                name: String::new(),
                types: vec![],
                address: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(parse_details(b"<html>").is_err());
    }

    #[test]
    fn test_new_rejects_unusable_key() {
        assert!(GooglePlacesClient::new("bad\nkey").is_err());
        assert!(GooglePlacesClient::new("AIza-test").is_ok());
    }
}
