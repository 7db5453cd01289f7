use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::ResolveError;

/// Body of every failed resolver request. Callers get no detail; the cause is
/// logged server-side.
pub const GENERIC_ERROR_BODY: &str = "Sorry, something went wrong";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Resolve(err) if err.is_empty_result() => {
                tracing::warn!("{}", err);
            }
            Self::Resolve(ResolveError::Provider { service, message }) => {
                tracing::warn!("{} API error: {}", service, message);
            }
            Self::Resolve(err) => tracing::error!("{}", err),
            Self::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_BODY).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}
