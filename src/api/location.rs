use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{AppState, ApiError, LocationQuery};
use crate::models::LocationRecord;

/// `GET /location?data=<text>`
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<LocationRecord>, ApiError> {
    let record = state.shared.locations.resolve(&query.data).await?;
    Ok(Json(record))
}
