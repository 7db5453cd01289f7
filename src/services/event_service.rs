use std::sync::Arc;
use tracing::{info, instrument};

use super::cache::{cache_or_fetch, non_empty, record_provider_outcome};
use super::{PersistMode, ResolveError, validate_coordinates};
use crate::clients::EventSearchProvider;
use crate::db::CacheStore;
use crate::models::EventRecord;

/// Nearby events per cached location.
///
/// A cache hit returns every stored row and stops there; the provider is only
/// contacted for locations with no stored events.
pub struct EventService {
    store: Arc<dyn CacheStore>,
    search: Arc<dyn EventSearchProvider>,
    persist_mode: PersistMode,
}

impl EventService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CacheStore>,
        search: Arc<dyn EventSearchProvider>,
        persist_mode: PersistMode,
    ) -> Self {
        Self {
            store,
            search,
            persist_mode,
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        location_id: i32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<EventRecord>, ResolveError> {
        cache_or_fetch(
            "events",
            async {
                self.store
                    .find_events(location_id)
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
    ) -> Result<Vec<EventRecord>, ResolveError> {
        validate_coordinates(latitude, longitude)?;

        let listings = self
            .search
            .search_events(latitude, longitude)
            .await
            .map_err(|e| {
                record_provider_outcome("events", "error");
                ResolveError::provider("events", &e)
            })?;

        if listings.is_empty() {
            record_provider_outcome("events", "empty");
            return Err(ResolveError::NoEventData(location_id));
        }
        record_provider_outcome("events", "ok");

        let records: Vec<EventRecord> = listings
            .iter()
            .map(|listing| EventRecord::from_listing(location_id, listing))
            .collect();

        let store = Arc::clone(&self.store);
        let rows = records.clone();
        self.persist_mode
            .persist("events", location_id, async move {
                store.insert_event_batch(location_id, &rows).await
            })
            .await?;

        info!("Fetched {} events for location {}", records.len(), location_id);

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::EventListing;
    use crate::clients::eventbrite::{EventStart, TextField};
    use crate::db::Store;
    use crate::services::test_support::{FakeEvents, file_store, memory_store, seed_locations};
    use std::time::Duration;
    use tokio::task::JoinSet;

    fn listing(name: &str, start: &str) -> EventListing {
        EventListing {
            url: format!("https://eventbrite.example/{name}"),
            name: TextField {
                text: Some(name.to_string()),
            },
            start: EventStart {
                local: Some(start.to_string()),
            },
            summary: Some(format!("{name} summary")),
            events: None,
        }
    }

    async fn setup(
        events: FakeEvents,
        mode: PersistMode,
    ) -> (Arc<Store>, Arc<FakeEvents>, EventService) {
        let store = memory_store().await;
        seed_locations(&store, 3).await;
        let events = Arc::new(events);
        let service = EventService::new(store.clone(), events.clone(), mode);
        (store, events, service)
    }

    #[tokio::test]
    async fn cold_location_fetches_and_persists() {
        let (store, provider, service) = setup(
            FakeEvents::returning(vec![
                listing("Jazz", "2024-05-01T19:00:00"),
                listing("Film", "2024-05-02T20:00:00"),
            ]),
            PersistMode::Awaited,
        )
        .await;

        let records = service.resolve(1, 47.6, -122.3).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Jazz");
        assert_eq!(records[0].event_date, "Wed May 01 2024");
        assert_eq!(records[1].event_date, "Thu May 02 2024");
        assert_eq!(provider.calls(), 1);
        assert_eq!(store.find_events(1).await.unwrap(), records);
    }

    #[tokio::test]
    async fn cache_hit_returns_all_rows_and_skips_provider() {
        let (store, provider, service) =
            setup(FakeEvents::returning(vec![]), PersistMode::Awaited).await;
        let stored = vec![
            EventRecord::from_listing(2, &listing("A", "2024-05-01T19:00:00")),
            EventRecord::from_listing(2, &listing("B", "2024-05-03T19:00:00")),
        ];
        store.insert_event_batch(2, &stored).await.unwrap();

        let records = service.resolve(2, 47.6, -122.3).await.unwrap();

        assert_eq!(records, stored);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn no_events_is_no_event_data() {
        let (store, _, service) = setup(FakeEvents::returning(vec![]), PersistMode::Awaited).await;

        let err = service.resolve(3, 47.6, -122.3).await.unwrap_err();

        assert!(matches!(err, ResolveError::NoEventData(3)));
        assert!(store.find_events(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn background_mode_answers_before_rows_land() {
        let (store, _, service) = setup(
            FakeEvents::returning(vec![listing("Jazz", "2024-05-01T19:00:00")]),
            PersistMode::Background,
        )
        .await;

        let records = service.resolve(1, 47.6, -122.3).await.unwrap();
        assert_eq!(records.len(), 1);

        // The spawned write shares the single in-memory connection; poll until it lands.
        let mut stored = Vec::new();
        for _ in 0..50 {
            stored = store.find_events(1).await.unwrap();
            if !stored.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(stored, records);
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let (_, _, service) = setup(FakeEvents::failing(), PersistMode::Awaited).await;

        let err = service.resolve(1, 47.6, -122.3).await.unwrap_err();
        assert!(matches!(err, ResolveError::Provider { service: "events", .. }));
    }

    #[tokio::test]
    async fn cached_rows_ignore_request_coordinates() {
        let (store, provider, service) =
            setup(FakeEvents::returning(vec![]), PersistMode::Awaited).await;
        let stored = vec![EventRecord::from_listing(
            2,
            &listing("A", "2024-05-01T19:00:00"),
        )];
        store.insert_event_batch(2, &stored).await.unwrap();

        let records = service.resolve(2, 0.0, 500.0).await.unwrap();

        assert_eq!(records, stored);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected_on_a_miss() {
        let (_, provider, service) = setup(
            FakeEvents::returning(vec![listing("A", "2024-05-01T19:00:00")]),
            PersistMode::Awaited,
        )
        .await;

        let err = service.resolve(1, 0.0, 500.0).await.unwrap_err();

        assert!(matches!(err, ResolveError::InvalidQuery(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cold_requests_all_succeed_and_store_once() {
        let db = file_store().await;
        seed_locations(&db.store, 3).await;
        let provider = Arc::new(
            FakeEvents::returning(vec![
                listing("Jazz", "2024-05-01T19:00:00"),
                listing("Film", "2024-05-02T20:00:00"),
            ])
            .with_delay(Duration::from_millis(50)),
        );
        let service = Arc::new(EventService::new(
            db.store.clone(),
            provider.clone(),
            PersistMode::Awaited,
        ));

        let mut tasks = JoinSet::new();
        for location_id in 1..=3 {
            for _ in 0..6 {
                let service = service.clone();
                tasks.spawn(async move { service.resolve(location_id, 47.6, -122.3).await });
            }
        }

        while let Some(joined) = tasks.join_next().await {
            assert_eq!(joined.unwrap().unwrap().len(), 2);
        }

        for location_id in 1..=3 {
            let stored = db.store.find_events(location_id).await.unwrap();
            let names: Vec<&str> = stored.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, ["Jazz", "Film"]);
        }
    }
}
