//! Shared HTTP plumbing for the backend client.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{Result, response_to_error};
use crate::http_client::build_http_client;

#[derive(Deserialize)]
struct HealthResponse {
    message: String,
}

/// HTTP client for the chat backend.
///
/// Cheap to clone; all clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = build_http_client(config.request_timeout);
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Decode a JSON response body into `T`, failing loudly on a non-2xx
    /// status or a shape mismatch.
    pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(response_to_error(response).await);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Health check against the backend root endpoint.
    pub async fn ping(&self) -> Result<String> {
        let response = self.http.get(self.url("/")).send().await?;
        let health: HealthResponse = Self::decode_json(response).await?;
        Ok(health.message)
    }
}
