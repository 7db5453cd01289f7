use thiserror::Error;

/// Failures of the cache-or-fetch resolvers.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No location data for query '{0}'")]
    NoLocationData(String),

    #[error("No weather data for location {0}")]
    NoWeatherData(i32),

    #[error("No event data for location {0}")]
    NoEventData(i32),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("External API error: {service} - {message}")]
    Provider {
        service: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl ResolveError {
    pub fn provider(service: &'static str, err: &anyhow::Error) -> Self {
        Self::Provider {
            service,
            message: format!("{err:#}"),
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    pub fn database(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }

    /// True for the "provider had nothing for this key" family.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        matches!(
            self,
            Self::NoLocationData(_) | Self::NoWeatherData(_) | Self::NoEventData(_)
        )
    }
}

impl From<sea_orm::DbErr> for ResolveError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Forecast request failed");
        let resolved = ResolveError::provider("forecast", &err);

        assert_eq!(
            resolved.to_string(),
            "External API error: forecast - Forecast request failed: connection refused"
        );
        assert!(!resolved.is_empty_result());
    }

    #[test]
    fn db_err_converts_to_database() {
        let db_err = sea_orm::DbErr::Custom("test".to_string());
        let err: ResolveError = db_err.into();
        assert!(matches!(err, ResolveError::Database(_)));
    }

    #[test]
    fn empty_result_variants() {
        assert!(ResolveError::NoWeatherData(1).is_empty_result());
        assert!(ResolveError::NoEventData(1).is_empty_result());
        assert!(ResolveError::NoLocationData("x".into()).is_empty_result());
    }
}
