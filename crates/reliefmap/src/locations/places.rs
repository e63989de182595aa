//! Remote place-search collaborator (Google Places text search).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::domain::BaseLocationDraft;
use crate::config::PlacesConfig;
use crate::geo::Coordinates;

/// Source name stamped on every draft produced by this client.
pub const GOOGLE_PLACES_SOURCE: &str = "google_places";

/// Bias radius, in metres, sent along with a location bias.
const BIAS_RADIUS_METRES: u32 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum PlaceSearchError {
    #[error("place search API key not configured")]
    NotConfigured,
    #[error("place search request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("place search returned status {0}")]
    Status(String),
    #[error("place search response could not be read: {0}")]
    Decode(String),
}

/// Looks up candidate places by free text, optionally biased towards a point.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn text_search(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<BaseLocationDraft>, PlaceSearchError>;
}

pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GooglePlacesClient {
    pub fn new(config: &PlacesConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    async fn text_search(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<BaseLocationDraft>, PlaceSearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PlaceSearchError::NotConfigured)?;

        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("key", api_key.to_string()),
            ("type", "establishment".to_string()),
        ];
        if let Some(point) = bias {
            params.push((
                "location",
                format!("{},{}", point.latitude, point.longitude),
            ));
            params.push(("radius", BIAS_RADIUS_METRES.to_string()));
        }

        debug!(query, biased = bias.is_some(), "querying place search");
        let body = self
            .client
            .get(format!("{}/textsearch/json", self.base_url))
            .query(&params)
            .send()
            .await?
            .text()
            .await?;

        let drafts = parse_text_search(&body)?;
        debug!(results = drafts.len(), "place search completed");
        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Converts a raw text-search payload into importable drafts.
///
/// Any status other than `OK`, `ZERO_RESULTS` included, is reported as a failure.
pub fn parse_text_search(body: &str) -> Result<Vec<BaseLocationDraft>, PlaceSearchError> {
    let response: TextSearchResponse =
        serde_json::from_str(body).map_err(|err| PlaceSearchError::Decode(err.to_string()))?;

    if response.status != "OK" {
        warn!(status = %response.status, "place search rejected the query");
        return Err(PlaceSearchError::Status(response.status));
    }

    Ok(response
        .results
        .into_iter()
        .map(|place| BaseLocationDraft {
            name: place.name,
            address: place.formatted_address,
            latitude: place.geometry.location.lat,
            longitude: place.geometry.location.lng,
            source_name: Some(GOOGLE_PLACES_SOURCE.to_string()),
            source_id: Some(place.place_id),
            is_official: true,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "status": "OK",
        "results": [
            {
                "place_id": "ChIJ-station",
                "name": "Tokyo Station Restroom",
                "formatted_address": "1 Chome Marunouchi, Chiyoda City, Tokyo",
                "geometry": { "location": { "lat": 35.681236, "lng": 139.767125 } },
                "types": ["establishment"]
            }
        ]
    }"#;

    #[test]
    fn maps_results_onto_official_drafts() {
        let drafts = parse_text_search(SAMPLE).expect("parses");
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.name, "Tokyo Station Restroom");
        assert_eq!(draft.source_name.as_deref(), Some(GOOGLE_PLACES_SOURCE));
        assert_eq!(draft.source_id.as_deref(), Some("ChIJ-station"));
        assert_eq!(draft.latitude, 35.681236);
        assert!(draft.is_official);
    }

    #[test]
    fn non_ok_status_is_an_error() {
        match parse_text_search(r#"{"status":"ZERO_RESULTS","results":[]}"#) {
            Err(PlaceSearchError::Status(status)) => assert_eq!(status, "ZERO_RESULTS"),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        assert!(matches!(
            parse_text_search("<html>"),
            Err(PlaceSearchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = GooglePlacesClient::new(&PlacesConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
        });
        assert!(matches!(
            client.text_search("toilet", None).await,
            Err(PlaceSearchError::NotConfigured)
        ));
    }
}
