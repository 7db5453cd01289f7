use serde::{Deserialize, Serialize};

/// `GET /location?data=<text>`
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub data: String,
}

/// `?data[id]=..&data[latitude]=..&data[longitude]=..` shared by the
/// weather and events routes. Flat `id`/`latitude`/`longitude` keys are
/// accepted too.
#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    #[serde(rename = "data[id]", alias = "id")]
    pub id: i32,

    #[serde(rename = "data[latitude]", alias = "latitude")]
    pub latitude: f64,

    #[serde(rename = "data[longitude]", alias = "longitude")]
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}
