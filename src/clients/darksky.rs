use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{ForecastProvider, ensure_success};
use crate::config::ProviderConfig;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    data: Vec<DailyForecast>,
}

/// One day of a Dark Sky style forecast.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub summary: String,
    /// Unix timestamp in seconds.
    pub time: i64,
}

#[derive(Clone)]
pub struct DarkSkyClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl DarkSkyClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, latitude, longitude
        )
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyClient {
    async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<DailyForecast>> {
        let url = self.request_url(latitude, longitude);

        debug!("Fetching forecast for {},{}", latitude, longitude);

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        let body: ForecastResponse = ensure_success("Forecast", response).await?.json().await?;

        Ok(body.daily.map(|d| d.data).unwrap_or_default())
    }
}
