//! Runtime configuration
//!
//! Resolved in layers: built-in defaults, then the JSON file under the user's
//! config dir, then environment variables. The API key only ever comes from
//! the file or the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geo::LatLng;

pub const DEFAULT_ENDPOINT: &str = "https://api.geoapify.com/v2/places";
pub const DEFAULT_QUIET_MS: u64 = 500;
pub const DEFAULT_RESULT_LIMIT: u32 = 50;

pub const ENV_API_KEY: &str = "PLACE_EXPLORER_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "GEOAPIFY_API_KEY";
pub const ENV_ENDPOINT: &str = "PLACE_EXPLORER_ENDPOINT";
pub const ENV_QUIET_MS: &str = "PLACE_EXPLORER_QUIET_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    /// Debounce window after the last map movement
    pub quiet_ms: u64,
    pub result_limit: u32,
    /// Unset means requests may hang indefinitely
    pub request_timeout_secs: Option<u64>,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            quiet_ms: DEFAULT_QUIET_MS,
            result_limit: DEFAULT_RESULT_LIMIT,
            request_timeout_secs: None,
            initial_center: LatLng::new(12.9716, 77.5946),
            initial_zoom: 13.0,
        }
    }
}

impl ExplorerConfig {
    /// Resolve the full configuration for the current user; requires an API key
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::resolve()?;
        if config.api_key.is_none() {
            let shown = config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "config.json".to_string());
            return Err(ConfigError::MissingApiKey(shown));
        }

        tracing::debug!("Resolved config: {}", config.redacted());
        Ok(config)
    }

    /// Defaults, then the config file if present, then the environment
    pub fn resolve() -> Result<Self, ConfigError> {
        let config = match config_path() {
            Some(p) if p.exists() => Self::from_file(&p)?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_API_KEY_FALLBACK)) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(endpoint) = non_empty(ENV_ENDPOINT) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(raw) = non_empty(ENV_QUIET_MS) {
            self.quiet_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_QUIET_MS,
                value: raw,
            })?;
        }
        Ok(self)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_quiet_ms(mut self, quiet_ms: u64) -> Self {
        self.quiet_ms = quiet_ms;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Human-readable summary with the API key masked
    pub fn redacted(&self) -> String {
        let key = match &self.api_key {
            Some(k) if k.chars().count() > 4 => format!("{}…", k.chars().take(4).collect::<String>()),
            Some(_) => "…".to_string(),
            None => "<unset>".to_string(),
        };
        format!(
            "endpoint={} api_key={} quiet_ms={} limit={} timeout={} center=({}, {}) zoom={}",
            self.endpoint,
            key,
            self.quiet_ms,
            self.result_limit,
            self.request_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "none".to_string()),
            self.initial_center.lat,
            self.initial_center.lon,
            self.initial_zoom,
        )
    }
}

/// `<config dir>/place-explorer/config.json`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("place-explorer").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.quiet_period(), Duration::from_millis(500));
        assert_eq!(config.result_limit, 50);
        assert!(config.request_timeout().is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ExplorerConfig::default()
            .apply_env(env(&[
                (ENV_API_KEY, "primary"),
                (ENV_API_KEY_FALLBACK, "fallback"),
                (ENV_ENDPOINT, "http://localhost:9000/v2/places"),
                (ENV_QUIET_MS, "250"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
        assert_eq!(config.endpoint, "http://localhost:9000/v2/places");
        assert_eq!(config.quiet_ms, 250);
    }

    #[test]
    fn test_env_key_fallback() {
        let config = ExplorerConfig::default()
            .apply_env(env(&[(ENV_API_KEY, "  "), (ENV_API_KEY_FALLBACK, "geo")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("geo"));
    }

    #[test]
    fn test_env_invalid_quiet() {
        let err = ExplorerConfig::default()
            .apply_env(env(&[(ENV_QUIET_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_QUIET_MS, .. }));
    }

    #[test]
    fn test_partial_file() {
        let dir = std::env::temp_dir().join(format!("place-explorer-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "api_key": "from-file", "initial_zoom": 15.0 }"#).unwrap();

        let config = ExplorerConfig::from_file(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.initial_zoom, 15.0);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ExplorerConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_redacted_hides_key() {
        let config = ExplorerConfig::default().with_api_key("992a4d3be8344087");
        let shown = config.redacted();
        assert!(shown.contains("992a…"));
        assert!(!shown.contains("992a4d3be8344087"));
    }
}
