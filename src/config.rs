use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::services::PersistMode;

const CONFIG_FILE_NAME: &str = "cityscope.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Connection string for the cache store (`sqlite:` or `postgres://`).
    pub database_url: String,

    pub log_level: String,

    /// `text` for human-readable lines, `json` for one JSON object per event.
    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data/cityscope.db".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins. A single `"*"` entry allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub geocode: ProviderConfig,

    pub forecast: ProviderConfig,

    pub events: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocode: ProviderConfig::with_base_url("https://maps.googleapis.com"),
            forecast: ProviderConfig::with_base_url("https://api.darksky.net"),
            events: ProviderConfig::with_base_url("https://www.eventbriteapi.com"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,

    /// API key or OAuth token. Usually supplied through the environment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    pub request_timeout_seconds: u64,
}

impl ProviderConfig {
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether bulk weather/event inserts finish before the response is sent.
    pub persist_mode: PersistMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Loads the first config file found, then layers `.env` and process
    /// environment overrides on top.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from: {}", path.display());
        }

        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(&path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cityscope").join(CONFIG_FILE_NAME));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cityscope").join(CONFIG_FILE_NAME));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies the environment variable names the deployment has always used.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.general.database_url = url;
        }

        if let Some(level) = get("LOG_LEVEL") {
            self.general.log_level = level;
        }

        if let Some(format) = get("LOG_FORMAT") {
            match format.trim().to_ascii_lowercase().as_str() {
                "json" => self.general.log_format = LogFormat::Json,
                "text" => self.general.log_format = LogFormat::Text,
                other => warn!("Ignoring unknown LOG_FORMAT '{}'", other),
            }
        }

        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!("Ignoring invalid PORT value '{}': {}", port, e),
            }
        }

        if let Some(key) = get("GEOCODE_API_KEY") {
            self.providers.geocode.api_key = key;
        }

        if let Some(key) = get("WEATHER_API_KEY") {
            self.providers.forecast.api_key = key;
        }

        if let Some(token) = get("PERSONAL_OAUTH_TOKEN") {
            self.providers.events.api_key = token;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_url.trim().is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        for (name, provider) in self.providers.iter() {
            if provider.base_url.trim().is_empty() {
                anyhow::bail!("Base URL for the {name} provider cannot be empty");
            }
            if provider.request_timeout_seconds == 0 {
                anyhow::bail!("Request timeout for the {name} provider must be > 0");
            }
            if provider.api_key.is_empty() {
                warn!("No API key configured for the {} provider", name);
            }
        }

        Ok(())
    }
}

impl ProvidersConfig {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &ProviderConfig)> {
        [
            ("geocode", &self.geocode),
            ("forecast", &self.forecast),
            ("events", &self.events),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.general.database_url, "sqlite:data/cityscope.db");
        assert_eq!(config.providers.forecast.base_url, "https://api.darksky.net");
        assert_eq!(config.cache.persist_mode, PersistMode::Awaited);
        assert_eq!(config.general.log_format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"
            log_format = "json"

            [providers.geocode]
            base_url = "http://localhost:9000"

            [cache]
            persist_mode = "background"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, LogFormat::Json);
        assert_eq!(config.providers.geocode.base_url, "http://localhost:9000");
        assert_eq!(config.providers.geocode.request_timeout_seconds, 30);
        assert_eq!(config.cache.persist_mode, PersistMode::Background);

        assert_eq!(config.providers.events.base_url, "https://www.eventbriteapi.com");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/city"),
            ("PORT", "8080"),
            ("GEOCODE_API_KEY", "geo-key"),
            ("WEATHER_API_KEY", "sky-key"),
            ("PERSONAL_OAUTH_TOKEN", "eb-token"),
            ("LOG_LEVEL", "  "),
            ("LOG_FORMAT", "JSON"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.general.database_url, "postgres://localhost/city");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.providers.geocode.api_key, "geo-key");
        assert_eq!(config.providers.forecast.api_key, "sky-key");
        assert_eq!(config.providers.events.api_key, "eb-token");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.providers.events.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_keys_not_serialized_when_empty() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("[providers.geocode]"));
        assert!(!toml_str.contains("api_key"));
    }
}
