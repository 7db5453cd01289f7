use anyhow::Result;
use async_trait::async_trait;

use super::Store;
use crate::models::{EventRecord, LocationRecord, NewLocation, WeatherRecord};

/// Store access used by the resolvers.
///
/// Batch inserts report whether they wrote anything: `false` means rows for
/// that location already existed and the batch was discarded.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn find_location(&self, search_query: &str) -> Result<Option<LocationRecord>>;

    async fn insert_location(&self, location: &NewLocation) -> Result<LocationRecord>;

    async fn find_weather(&self, location_id: i32) -> Result<Vec<WeatherRecord>>;

    async fn insert_weather_batch(&self, location_id: i32, records: &[WeatherRecord])
    -> Result<bool>;

    async fn find_events(&self, location_id: i32) -> Result<Vec<EventRecord>>;

    async fn insert_event_batch(&self, location_id: i32, records: &[EventRecord]) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl CacheStore for Store {
    async fn find_location(&self, search_query: &str) -> Result<Option<LocationRecord>> {
        let row = self.location_repo().find_by_query(search_query).await?;
        Ok(row.map(LocationRecord::from))
    }

    async fn insert_location(&self, location: &NewLocation) -> Result<LocationRecord> {
        let row = self.location_repo().insert_or_get(location).await?;
        Ok(row.into())
    }

    async fn find_weather(&self, location_id: i32) -> Result<Vec<WeatherRecord>> {
        let rows = self.weather_repo().list_for_location(location_id).await?;
        Ok(rows.into_iter().map(WeatherRecord::from).collect())
    }

    async fn insert_weather_batch(
        &self,
        location_id: i32,
        records: &[WeatherRecord],
    ) -> Result<bool> {
        self.weather_repo()
            .insert_batch_if_absent(location_id, records)
            .await
    }

    async fn find_events(&self, location_id: i32) -> Result<Vec<EventRecord>> {
        let rows = self.event_repo().list_for_location(location_id).await?;
        Ok(rows.into_iter().map(EventRecord::from).collect())
    }

    async fn insert_event_batch(&self, location_id: i32, records: &[EventRecord]) -> Result<bool> {
        self.event_repo()
            .insert_batch_if_absent(location_id, records)
            .await
    }

    async fn ping(&self) -> Result<()> {
        Store::ping(self).await
    }
}
