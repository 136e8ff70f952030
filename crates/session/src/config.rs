use std::env;

use foundation::{CITY_BLOCK_ZOOM, Viewport};
use protocol::QUERY_PATH;

/// Environment variable holding the answering-service base URL.
pub const API_URL_VAR: &str = "GEO_QUERY_API_URL";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const PLACEHOLDER_ROWS: usize = 5;

/// Suggestions offered next to the query input. Choosing one fills the input
/// without submitting.
pub const EXAMPLE_QUERIES: [&str; 3] = [
    "Most funded startups",
    "Latest unicorn startups",
    "Top AI companies in India",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub api_base_url: String,
    pub query_path: String,
    pub initial_viewport: Viewport,
    pub focus_zoom: u8,
    pub placeholder_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl(url) => {
                write!(f, "base url must start with http:// or https://, got `{url}`")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            query_path: QUERY_PATH.to_string(),
            initial_viewport: Viewport::initial(),
            focus_zoom: CITY_BLOCK_ZOOM,
            placeholder_rows: PLACEHOLDER_ROWS,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            api_base_url: trimmed.to_string(),
            ..Self::default()
        })
    }

    /// Resolves the base URL at start time.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves the base URL through `lookup`, falling back to
    /// [`DEFAULT_API_URL`] when the variable is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::with_base_url(&url)
    }

    /// Resolves the base URL at build time (for targets without a process
    /// environment, such as the browser).
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::with_base_url(option_env!("GEO_QUERY_API_URL").unwrap_or(DEFAULT_API_URL))
    }

    pub fn query_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.query_path)
    }

    pub fn focus_viewport(&self, feature: &protocol::GeoFeature) -> Viewport {
        Viewport::new(feature.position, self.focus_zoom)
    }
}
