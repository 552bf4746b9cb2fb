//! User info API client error types.

/// Errors from user info API calls.
///
/// Non-2xx answers are split by status class so callers can classify them
/// without inspecting numbers: [`UserClientError::ClientStatus`] for 4xx,
/// [`UserClientError::ServerStatus`] for everything else.
#[derive(Debug, thiserror::Error)]
pub enum UserClientError {
    /// HTTP transport error (connect, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The API answered with a 4xx status.
    #[error("user API {endpoint} returned client error {status}")]
    ClientStatus { endpoint: String, status: u16 },
    /// The API answered with a 5xx (or otherwise unsuccessful) status.
    #[error("user API {endpoint} returned server error {status}")]
    ServerStatus { endpoint: String, status: u16 },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl UserClientError {
    /// Whether the upstream rejected the request itself (4xx).
    ///
    /// Transport, deserialization, and 5xx failures are server-side.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientStatus { .. })
    }

    /// The upstream status code, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ClientStatus { status, .. } | Self::ServerStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
