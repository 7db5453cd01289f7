use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{AppState, ApiError, CoordinatesQuery};
use crate::models::EventRecord;

/// `GET /events?data[id]=..&data[latitude]=..&data[longitude]=..`
pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoordinatesQuery>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let records = state
        .shared
        .events
        .resolve(query.id, query.latitude, query.longitude)
        .await?;
    Ok(Json(records))
}
