//! In-memory store and counting provider fakes for resolver tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::clients::{
    DailyForecast, EventListing, EventSearchProvider, ForecastProvider, GeocodeResult, Geocoder,
};
use crate::db::{CacheStore, Store};
use crate::models::NewLocation;

pub async fn memory_store() -> Arc<Store> {
    Arc::new(Store::new("sqlite::memory:").await.unwrap())
}

/// A pooled store over a throwaway sqlite file, for tests that need real
/// concurrent connections. The file is removed when the guard drops.
pub struct FileStore {
    pub store: Arc<Store>,
    path: PathBuf,
}

impl Drop for FileStore {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut path = self.path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

pub async fn file_store() -> FileStore {
    let path = std::env::temp_dir().join(format!("cityscope-test-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}", path.display());
    let store = Store::with_pool_options(&url, 8, 1).await.unwrap();
    FileStore {
        store: Arc::new(store),
        path,
    }
}

/// Inserts `count` locations so that ids `1..=count` exist.
pub async fn seed_locations(store: &Store, count: i32) {
    for i in 1..=count {
        let location = NewLocation {
            search_query: format!("City {i}"),
            formatted_query: format!("City {i}, Nowhere"),
            latitude: f64::from(i),
            longitude: -f64::from(i),
        };
        let stored = store.insert_location(&location).await.unwrap();
        assert_eq!(stored.id, i);
    }
}

/// Canned answers plus a call counter. `None` makes every call fail.
struct Canned<T> {
    answer: Option<Vec<T>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl<T: Clone> Canned<T> {
    const fn new(answer: Option<Vec<T>>) -> Self {
        Self {
            answer,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    async fn answer(&self, service: &str) -> Result<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer
            .clone()
            .ok_or_else(|| anyhow!("{service} API error: 503 Service Unavailable"))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct FakeGeocoder(Canned<GeocodeResult>);

impl FakeGeocoder {
    /// Holds every answer back so concurrent callers all miss the cache.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = delay;
        self
    }

    pub const fn returning(results: Vec<GeocodeResult>) -> Self {
        Self(Canned::new(Some(results)))
    }

    pub const fn failing() -> Self {
        Self(Canned::new(None))
    }

    pub fn calls(&self) -> usize {
        self.0.calls()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Vec<GeocodeResult>> {
        self.0.answer("Geocode").await
    }
}

pub struct FakeForecast(Canned<DailyForecast>);

impl FakeForecast {
    /// Holds every answer back so concurrent callers all miss the cache.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = delay;
        self
    }

    pub const fn returning(days: Vec<DailyForecast>) -> Self {
        Self(Canned::new(Some(days)))
    }

    pub const fn failing() -> Self {
        Self(Canned::new(None))
    }

    pub fn calls(&self) -> usize {
        self.0.calls()
    }
}

#[async_trait]
impl ForecastProvider for FakeForecast {
    async fn daily_forecast(&self, _latitude: f64, _longitude: f64) -> Result<Vec<DailyForecast>> {
        self.0.answer("Forecast").await
    }
}

pub struct FakeEvents(Canned<EventListing>);

impl FakeEvents {
    /// Holds every answer back so concurrent callers all miss the cache.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = delay;
        self
    }

    pub const fn returning(listings: Vec<EventListing>) -> Self {
        Self(Canned::new(Some(listings)))
    }

    pub const fn failing() -> Self {
        Self(Canned::new(None))
    }

    pub fn calls(&self) -> usize {
        self.0.calls()
    }
}

#[async_trait]
impl EventSearchProvider for FakeEvents {
    async fn search_events(&self, _latitude: f64, _longitude: f64) -> Result<Vec<EventListing>> {
        self.0.answer("Eventbrite").await
    }
}
