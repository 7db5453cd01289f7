//! Normalized records served to callers and cached in the store.

pub mod event;
pub mod location;
pub mod weather;

pub use event::EventRecord;
pub use location::{LocationRecord, NewLocation};
pub use weather::WeatherRecord;

/// Calendar date format shared by weather and event records, e.g. `Mon Jan 01 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%a %b %d %Y";
