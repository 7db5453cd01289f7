use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{Geocoder, ensure_success};
use crate::config::ProviderConfig;

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResult {
    #[must_use]
    pub fn new(formatted_address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            geometry: Geometry {
                location: LatLng { lat, lng },
            },
        }
    }
}

/// Google Maps geocoding API client.
#[derive(Clone)]
pub struct GoogleGeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GoogleGeocodeClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    fn request_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{GEOCODE_PATH}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("address", query)
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocodeClient {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>> {
        let url = self.request_url(query)?;

        debug!("Geocoding query: {}", query);

        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let body: GeocodeResponse = ensure_success("Geocode", response).await?.json().await?;

        // ZERO_RESULTS is an empty answer, not a failure.
        match body.status.as_str() {
            "" | "OK" | "ZERO_RESULTS" => Ok(body.results),
            status => Err(anyhow::anyhow!(
                "Geocode API error: {} - {}",
                status,
                body.error_message.unwrap_or_default()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleGeocodeClient {
        let config = ProviderConfig {
            base_url: "https://maps.example.com/".to_string(),
            api_key: "secret".to_string(),
            request_timeout_seconds: 5,
        };
        GoogleGeocodeClient::with_shared_client(Client::new(), &config)
    }

    #[test]
    fn request_url_encodes_query() {
        let url = client().request_url("Seattle, WA & more").unwrap();
        assert_eq!(url.path(), "/maps/api/geocode/json");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("address".to_string(), "Seattle, WA & more".to_string()),
                ("key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn parses_provider_payload() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [{
                "formatted_address": "Seattle, WA, USA",
                "geometry": { "location": { "lat": 47.6, "lng": -122.3 }, "location_type": "APPROXIMATE" },
                "place_id": "abc"
            }]
        });

        let parsed: GeocodeResponse = serde_json::from_value(body).unwrap();
        assert_eq!(
            parsed.results,
            vec![GeocodeResult::new("Seattle, WA, USA", 47.6, -122.3)]
        );
    }
}
