use std::sync::Arc;

use crate::clients::{
    DarkSkyClient, EventSearchProvider, EventbriteClient, ForecastProvider, Geocoder,
    GoogleGeocodeClient, build_http_client,
};
use crate::config::Config;
use crate::db::{CacheStore, Store};
use crate::services::{EventService, LocationService, WeatherService};

/// Everything a request handler or CLI command needs, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub locations: Arc<LocationService>,

    pub weather: Arc<WeatherService>,

    pub events: Arc<EventService>,
}

impl SharedState {
    /// Connects the store and wires the real provider clients over one
    /// pooled HTTP client.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client = build_http_client()?;
        let providers = &config.providers;

        let geocoder = Arc::new(GoogleGeocodeClient::with_shared_client(
            http_client.clone(),
            &providers.geocode,
        ));
        let forecast = Arc::new(DarkSkyClient::with_shared_client(
            http_client.clone(),
            &providers.forecast,
        ));
        let events = Arc::new(EventbriteClient::with_shared_client(
            http_client,
            &providers.events,
        ));

        Ok(Self::with_providers(config, store, geocoder, forecast, events))
    }

    /// Wires the resolvers over an existing store and arbitrary providers.
    #[must_use]
    pub fn with_providers(
        config: Config,
        store: Store,
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastProvider>,
        events: Arc<dyn EventSearchProvider>,
    ) -> Self {
        let persist_mode = config.cache.persist_mode;
        let cache: Arc<dyn CacheStore> = Arc::new(store.clone());

        Self {
            config: Arc::new(config),
            locations: Arc::new(LocationService::new(cache.clone(), geocoder)),
            weather: Arc::new(WeatherService::new(cache.clone(), forecast, persist_mode)),
            events: Arc::new(EventService::new(cache, events, persist_mode)),
            store,
        }
    }
}
