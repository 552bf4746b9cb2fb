//! # board-user-client — Typed client for the user info API
//!
//! Resolves a board writer's display name by user id:
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/user/info?writerId={id}` | Writer id + display name |
//!
//! Every non-2xx answer is logged and returned as a classified
//! [`UserClientError`]; 4xx answers are client errors, everything else
//! (5xx, transport, undecodable body) is a server-side failure. The client
//! never retries.

pub mod config;
pub mod error;

pub use config::UserClientConfig;
pub use error::UserClientError;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Writer identity as returned by the user info API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterInfo {
    pub id: i64,
    pub name: String,
}

/// Client for the user info API.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl UserClient {
    /// Create a new client from configuration.
    pub fn new(config: UserClientConfig) -> Result<Self, UserClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UserClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch the writer with the given user id.
    ///
    /// Calls `GET {base_url}/api/user/info?writerId={writer_id}`.
    pub async fn writer_info(&self, writer_id: i64) -> Result<WriterInfo, UserClientError> {
        let endpoint = "GET /api/user/info";
        let mut url = self.base_url.join("api/user/info").map_err(|e| {
            config::ConfigError::InvalidUrl(self.base_url.to_string(), e.to_string())
        })?;
        url.query_pairs_mut()
            .append_pair("writerId", &writer_id.to_string());

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(method = "GET", uri = %url, error = %e, "user API call failed");
                UserClientError::Http {
                    endpoint: endpoint.into(),
                    source: e,
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                method = "GET",
                uri = %url,
                "user API call failed"
            );
            return Err(if status.is_client_error() {
                UserClientError::ClientStatus {
                    endpoint: endpoint.into(),
                    status: status.as_u16(),
                }
            } else {
                UserClientError::ServerStatus {
                    endpoint: endpoint.into(),
                    status: status.as_u16(),
                }
            });
        }

        resp.json().await.map_err(|e| UserClientError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }
}
