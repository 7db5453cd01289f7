use serde_json::json;
use tracing::warn;

use crate::config::Config;
use crate::state::SharedState;

/// Resolves `query` the same way the HTTP routes do, sharing their cache.
pub async fn cmd_lookup(config: Config, query: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let location = state.locations.resolve(query).await?;
    let (lat, lon) = (location.latitude, location.longitude);

    let weather = match state.weather.resolve(location.id, lat, lon).await {
        Ok(records) => serde_json::to_value(records)?,
        Err(e) => {
            warn!("Weather lookup failed: {}", e);
            serde_json::Value::Null
        }
    };

    let events = match state.events.resolve(location.id, lat, lon).await {
        Ok(records) => serde_json::to_value(records)?,
        Err(e) => {
            warn!("Event lookup failed: {}", e);
            serde_json::Value::Null
        }
    };

    let output = json!({
        "location": location,
        "weather": weather,
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
