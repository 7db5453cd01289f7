use std::sync::Arc;
use tracing::{info, instrument};

use super::cache::{cache_or_fetch, non_empty, record_provider_outcome};
use super::{PersistMode, ResolveError, validate_coordinates};
use crate::clients::ForecastProvider;
use crate::db::CacheStore;
use crate::models::WeatherRecord;

/// Daily forecasts per cached location. Rows are written once and never refreshed.
pub struct WeatherService {
    store: Arc<dyn CacheStore>,
    forecast: Arc<dyn ForecastProvider>,
    persist_mode: PersistMode,
}

impl WeatherService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CacheStore>,
        forecast: Arc<dyn ForecastProvider>,
        persist_mode: PersistMode,
    ) -> Self {
        Self {
            store,
            forecast,
            persist_mode,
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        location_id: i32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<WeatherRecord>, ResolveError> {
        cache_or_fetch(
            "weather",
            async {
                self.store
                    .find_weather(location_id)
                    .await
                    .map(non_empty)
                    .map_err(ResolveError::database)
            },
            || self.fetch_and_store(location_id, latitude, longitude),
        )
        .await
    }

    async fn fetch_and_store(
        &self,
        location_id: i32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<WeatherRecord>, ResolveError> {
        validate_coordinates(latitude, longitude)?;

        let days = self
            .forecast
            .daily_forecast(latitude, longitude)
            .await
            .map_err(|e| {
                record_provider_outcome("forecast", "error");
                ResolveError::provider("forecast", &e)
            })?;

        if days.is_empty() {
            record_provider_outcome("forecast", "empty");
            return Err(ResolveError::NoWeatherData(location_id));
        }
        record_provider_outcome("forecast", "ok");

        let records: Vec<WeatherRecord> = days
            .iter()
            .map(|day| WeatherRecord::from_daily(location_id, day))
            .collect();

        let store = Arc::clone(&self.store);
        let rows = records.clone();
        self.persist_mode
            .persist("weather", location_id, async move {
                store.insert_weather_batch(location_id, &rows).await
            })
            .await?;

        info!(
            "Fetched {} forecast days for location {}",
            records.len(),
            location_id
        );

        Ok(records)
    }
}
