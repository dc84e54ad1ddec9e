// Application configuration.
// Loaded from a TOML file in the config directory, then overridden from the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::api::{Endpoints, Units};
use crate::error::{PanoramaError, Result};
use crate::storage::{WEATHER_CACHE_TTL, paths};

/// Environment variable holding the Weatherstack access key.
pub const ACCESS_KEY_ENV: &str = "WEATHERSTACK_ACCESS_KEY";
/// Environment variable pointing at an alternate config file.
pub const CONFIG_PATH_ENV: &str = "PANORAMA_CONFIG";

/// Values shipped in example configs that mean "not set".
const PLACEHOLDER_KEYS: &[&str] = &["YOUR_KEY_HERE", "PLACEHOLDER_KEY_REPLACE_ME"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherSettings,
    pub ui: UiSettings,
    pub http: HttpSettings,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub access_key: Option<String>,
    pub default_units: Units,
    pub cache_ttl_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            access_key: None,
            default_units: Units::Metric,
            cache_ttl_secs: WEATHER_CACHE_TTL.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub debounce_ms: u64,
    pub toast_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            toast_ms: 2500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from `$PANORAMA_CONFIG` or the default path, then apply environment overrides.
    /// A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(paths::config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PanoramaError::Config(e.to_string()))
    }

    /// Apply environment-style overrides through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ACCESS_KEY_ENV) {
            self.weather.access_key = Some(key);
        }
    }

    /// Usable Weatherstack key; blank and placeholder values count as missing.
    pub fn weather_access_key(&self) -> Option<&str> {
        self.weather
            .access_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_KEYS.contains(key))
    }

    pub fn weather_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.weather.cache_ttl_secs)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.ui.debounce_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.toast_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.debounce_delay(), Duration::from_millis(300));
        assert_eq!(config.weather_cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.weather.default_units, Units::Metric);
        assert_eq!(config.endpoints, Endpoints::default());
        assert!(config.weather_access_key().is_none());
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
            [weather]
            access_key = "abc123"
            default_units = "f"

            [endpoints]
            weatherstack = "http://localhost:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.weather_access_key(), Some("abc123"));
        assert_eq!(config.weather.default_units, Units::Fahrenheit);
        assert_eq!(config.weather.cache_ttl_secs, 600);
        assert_eq!(config.endpoints.weatherstack, "http://localhost:8080");
        assert_eq!(
            config.endpoints.jsonplaceholder,
            "https://jsonplaceholder.typicode.com"
        );
    }

    #[test]
    fn test_parse_invalid_file() {
        let err = Config::parse("[weather]\ndefault_units = \"kelvin\"").unwrap_err();
        assert!(matches!(err, PanoramaError::Config(_)));
    }

    #[test]
    fn test_placeholder_key_is_missing() {
        let mut config = Config::default();
        config.weather.access_key = Some("YOUR_KEY_HERE".to_string());
        assert!(config.weather_access_key().is_none());

        config.weather.access_key = Some("   ".to_string());
        assert!(config.weather_access_key().is_none());
    }

    #[test]
    fn test_env_override_wins() {
        let mut config = Config::parse("[weather]\naccess_key = \"from-file\"").unwrap();
        config.apply_overrides(|name| (name == ACCESS_KEY_ENV).then(|| "from-env".to_string()));
        assert_eq!(config.weather_access_key(), Some("from-env"));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[ui]\ndebounce_ms = 150\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.debounce_delay(), Duration::from_millis(150));
        assert_eq!(config.toast_duration(), Duration::from_millis(2500));
    }
}
