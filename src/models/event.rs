use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::DISPLAY_DATE_FORMAT;
use crate::clients::EventListing;
use crate::entities::events;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventData")]
    pub event_data: Option<serde_json::Value>,
    pub link: String,
    pub name: String,
    pub event_date: String,
    pub summary: String,
    #[serde(rename = "id")]
    pub location_id: i32,
}

impl EventRecord {
    #[must_use]
    pub fn from_listing(location_id: i32, listing: &EventListing) -> Self {
        Self {
            event_data: listing.events.clone(),
            link: listing.url.clone(),
            name: listing.name.text.clone().unwrap_or_default(),
            event_date: listing
                .start
                .local
                .as_deref()
                .map(format_start_date)
                .unwrap_or_default(),
            summary: listing.summary.clone().unwrap_or_default(),
            location_id,
        }
    }
}

impl From<events::Model> for EventRecord {
    fn from(model: events::Model) -> Self {
        Self {
            event_data: model
                .event_data
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
            link: model.link,
            name: model.name,
            event_date: model.event_date,
            summary: model.summary,
            location_id: model.location_id,
        }
    }
}

/// Reduces a provider start timestamp to a calendar date.
///
/// Accepts local wall-clock (`2024-05-01T19:00:00`), RFC 3339 and bare dates.
/// Anything else is returned unchanged so the caller still sees something.
#[must_use]
pub fn format_start_date(raw: &str) -> String {
    let raw = raw.trim();

    let date = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}
