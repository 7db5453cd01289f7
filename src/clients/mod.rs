//! HTTP clients for the external geocoding, forecast and events providers.
//!
//! Each provider sits behind a small trait so resolvers can be exercised
//! against in-process fakes.

pub mod darksky;
pub mod eventbrite;
pub mod google;

use anyhow::Result;
use async_trait::async_trait;

pub use darksky::{DailyForecast, DarkSkyClient};
pub use eventbrite::{EventListing, EventbriteClient};
pub use google::{GeocodeResult, GoogleGeocodeClient};

const USER_AGENT: &str = concat!("Cityscope/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves free text to candidate places, best match first.
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>>;
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Daily forecast entries for a coordinate, in chronological order.
    async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<DailyForecast>>;
}

#[async_trait]
pub trait EventSearchProvider: Send + Sync {
    async fn search_events(&self, latitude: f64, longitude: f64) -> Result<Vec<EventListing>>;
}

/// Build a shared HTTP client for all providers.
/// Timeouts are applied per request from each provider's config.
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Turns a non-success response into an error carrying status and body.
pub(crate) async fn ensure_success(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(anyhow::anyhow!("{service} API error: {status} - {body}"))
}
