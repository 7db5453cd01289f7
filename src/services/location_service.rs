use std::sync::Arc;
use tracing::{info, instrument};

use super::cache::{cache_or_fetch, record_provider_outcome};
use super::ResolveError;
use crate::clients::Geocoder;
use crate::db::CacheStore;
use crate::models::{LocationRecord, NewLocation};

/// Resolves free-text searches to stored coordinates.
pub struct LocationService {
    store: Arc<dyn CacheStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    /// Returns the stored location for `query`, geocoding and storing it on
    /// first sight. Surrounding whitespace is not part of the key.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Result<LocationRecord, ResolveError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolveError::InvalidQuery(
                "location search text is empty".to_string(),
            ));
        }

        cache_or_fetch(
            "location",
            async {
                self.store
                    .find_location(query)
                    .await
                    .map_err(ResolveError::database)
            },
            || self.fetch_and_store(query),
        )
        .await
    }

    async fn fetch_and_store(&self, query: &str) -> Result<LocationRecord, ResolveError> {
        let results = self.geocoder.geocode(query).await.map_err(|e| {
            record_provider_outcome("geocode", "error");
            ResolveError::provider("geocode", &e)
        })?;

        let Some(best) = results.first() else {
            record_provider_outcome("geocode", "empty");
            return Err(ResolveError::NoLocationData(query.to_string()));
        };
        record_provider_outcome("geocode", "ok");

        let draft = NewLocation::from_geocode(query, best);
        let stored = self
            .store
            .insert_location(&draft)
            .await
            .map_err(ResolveError::database)?;

        info!(
            "Cached location '{}' as {} (id {})",
            stored.search_query, stored.formatted_query, stored.id
        );

        Ok(stored)
    }
}
