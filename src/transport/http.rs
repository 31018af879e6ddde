//! HTTP transport for requesters outside the server process.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::Transport;
use crate::error::{CacheError, Result};
use crate::models::CacheRequest;

/// Posts request messages to a running cache server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/message", base_url.as_ref().trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: CacheRequest) -> Result<Option<Value>> {
        debug!("POST {} {} {}", self.endpoint, request.code(), request.key());
        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| status.to_string());

            return Err(match status {
                StatusCode::BAD_REQUEST => CacheError::InvalidRequest(message),
                _ => CacheError::Transport(message),
            });
        }

        match response.json::<Value>().await? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}
