use serde::{Deserialize, Serialize};

use crate::clients::GeocodeResult;
use crate::entities::locations;

/// A geocoded search, keyed by the exact text that was searched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: i32,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A location that has not been persisted yet and so has no id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewLocation {
    #[must_use]
    pub fn from_geocode(query: &str, result: &GeocodeResult) -> Self {
        Self {
            search_query: query.to_string(),
            formatted_query: result.formatted_address.clone(),
            latitude: result.geometry.location.lat,
            longitude: result.geometry.location.lng,
        }
    }
}

impl From<locations::Model> for LocationRecord {
    fn from(model: locations::Model) -> Self {
        Self {
            id: model.id,
            search_query: model.search_query,
            formatted_query: model.formatted_query,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}
