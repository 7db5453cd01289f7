use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{AppState, ApiError, CoordinatesQuery};
use crate::models::WeatherRecord;

/// `GET /weather?data[id]=..&data[latitude]=..&data[longitude]=..`
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoordinatesQuery>,
) -> Result<Json<Vec<WeatherRecord>>, ApiError> {
    let records = state
        .shared
        .weather
        .resolve(query.id, query.latitude, query.longitude)
        .await?;
    Ok(Json(records))
}
