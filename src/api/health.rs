use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AppState, HealthResponse};

/// `GET /health`
///
/// Readiness probe; answers 503 when the store cannot be reached.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let database = state.shared.store.ping().await.is_ok();

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" },
            database,
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    )
        .into_response()
}
