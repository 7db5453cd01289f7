use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{EventSearchProvider, ensure_success};
use crate::config::ProviderConfig;

const SEARCH_PATH: &str = "/v3/events/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    events: Vec<EventListing>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: TextField,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: EventStart,
    #[serde(default)]
    pub summary: Option<String>,
    /// Nested payload some listings carry; passed through untouched.
    #[serde(default)]
    pub events: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextField {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventStart {
    /// Local wall-clock start, e.g. `2024-05-01T19:00:00`.
    #[serde(default)]
    pub local: Option<String>,
}

/// Listings arrive with explicit `null`s for fields the organizer left blank.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone)]
pub struct EventbriteClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl EventbriteClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_key.clone(),
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{SEARCH_PATH}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("token", &self.token)
            .append_pair("location.longitude", &longitude.to_string())
            .append_pair("location.latitude", &latitude.to_string())
            .append_pair("expand", "venue");
        Ok(url)
    }
}

#[async_trait]
impl EventSearchProvider for EventbriteClient {
    async fn search_events(&self, latitude: f64, longitude: f64) -> Result<Vec<EventListing>> {
        let url = self.request_url(latitude, longitude)?;

        debug!("Searching events near {},{}", latitude, longitude);

        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let body: SearchResponse = ensure_success("Eventbrite", response).await?.json().await?;

        Ok(body.events)
    }
}
