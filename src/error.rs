//! Error types shared by the library and the app

/// Failure while resolving [`crate::config::ExplorerConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API key configured: set PLACE_EXPLORER_API_KEY (or GEOAPIFY_API_KEY) or add \"api_key\" to {0}")]
    MissingApiKey(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Places search failure.
///
/// Payloads are plain strings so the error can ride inside iced messages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacesError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error: {0} {1}")]
    Status(u16, String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PlacesError::Decode(e.to_string())
        } else {
            PlacesError::Request(e.to_string())
        }
    }
}
