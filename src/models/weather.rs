use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::DISPLAY_DATE_FORMAT;
use crate::clients::DailyForecast;
use crate::entities::weathers;

/// One day of forecast for a cached location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub forecast: String,
    pub time: String,
    /// Owning location; exposed as `id` on the wire.
    #[serde(rename = "id")]
    pub location_id: i32,
}

impl WeatherRecord {
    #[must_use]
    pub fn from_daily(location_id: i32, day: &DailyForecast) -> Self {
        Self {
            forecast: day.summary.clone(),
            time: format_epoch_date(day.time),
            location_id,
        }
    }
}

impl From<weathers::Model> for WeatherRecord {
    fn from(model: weathers::Model) -> Self {
        Self {
            forecast: model.forecast,
            time: model.time,
            location_id: model.location_id,
        }
    }
}

/// Formats a Unix timestamp (seconds) as a UTC calendar date. The time of day
/// is dropped. Timestamps chrono cannot represent are rendered as the raw number.
#[must_use]
pub fn format_epoch_date(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0).map_or_else(
        || epoch_seconds.to_string(),
        |dt| dt.format(DISPLAY_DATE_FORMAT).to_string(),
    )
}
