//! Cache-or-fetch resolvers for locations, forecasts and events.

pub(crate) mod cache;
pub mod error;
pub mod event_service;
pub mod location_service;
pub mod persist;
pub mod weather_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ResolveError;
pub use event_service::EventService;
pub use location_service::LocationService;
pub use persist::PersistMode;
pub use weather_service::WeatherService;

/// Rejects coordinates no provider could answer for.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ResolveError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ResolveError::InvalidQuery(format!(
            "latitude {latitude} is outside -90..=90"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ResolveError::InvalidQuery(format!(
            "longitude {longitude} is outside -180..=180"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_in_range_pass() {
        assert!(validate_coordinates(47.6, -122.3).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
    }

    #[test]
    fn coordinates_out_of_range_fail() {
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}
