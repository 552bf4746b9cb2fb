//! User info API client configuration.
//!
//! The user info API is served by the board application itself in the
//! default deployment, so the caller supplies the local listener's URL as
//! the default base.

use url::Url;

/// Configuration for connecting to the user info API.
#[derive(Debug, Clone)]
pub struct UserClientConfig {
    /// Base URL of the service exposing `/api/user/info`.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl UserClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BOARD_USER_API_URL` (default: `default_base_url`)
    /// - `BOARD_USER_API_TIMEOUT_SECS` (default: 10)
    pub fn from_env(default_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("BOARD_USER_API_URL", default_base_url)?,
            timeout_secs: std::env::var("BOARD_USER_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }

    /// Point the client at an explicit base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: 10,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
