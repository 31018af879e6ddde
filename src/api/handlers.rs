//! API Handlers
//!
//! HTTP request handlers for the background context's endpoints.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::models::{CacheRequest, HealthResponse};
use crate::tasks::spawn_cache_store;
use crate::transport::{ChannelTransport, Transport};

/// Application state shared across all handlers.
///
/// Holds a transport to the listener task, which owns the cache store.
#[derive(Clone)]
pub struct AppState {
    /// Message channel to the cache store
    pub transport: ChannelTransport,
}

impl AppState {
    /// Creates a new AppState over an already running listener.
    pub fn new(transport: ChannelTransport) -> Self {
        Self { transport }
    }

    /// Starts a listener for `store` using the configured purge interval
    /// and queue depth.
    pub fn spawn(store: CacheStore, config: &Config) -> (Self, JoinHandle<CacheStore>) {
        let (transport, handle) =
            spawn_cache_store(store, config.purge_interval, config.channel_capacity);
        (Self::new(transport), handle)
    }
}

/// Handler for POST /message
///
/// Forwards a get-cache or set-cache message to the cache store and replies
/// with the raw value, or `null` when there is none. Any body that is not a
/// known message (not JSON, unknown code, missing fields) is ignored and
/// answered with `null`, whatever its content type.
pub async fn message_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>> {
    let request = match serde_json::from_slice::<CacheRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!("Ignoring unrecognised message: {}", err);
            return Ok(Json(Value::Null));
        }
    };

    let reply = state.transport.send(request).await?;
    Ok(Json(reply.unwrap_or(Value::Null)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_bytes(value: Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    fn test_state() -> AppState {
        AppState::spawn(CacheStore::new(), &Config::default()).0
    }

    #[tokio::test]
    async fn test_set_and_get_message() {
        let state = test_state();

        let body = json!({"code": "set-cache", "key": "k", "value": "v", "expiration": 1});
        let reply = message_handler(State(state.clone()), to_bytes(body)).await.unwrap();
        assert_eq!(reply.0, Value::Null);

        let body = json!({"code": "get-cache", "key": "k"});
        let reply = message_handler(State(state), to_bytes(body)).await.unwrap();
        assert_eq!(reply.0, json!("v"));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_null() {
        let state = test_state();

        let body = json!({"code": "get-cache", "key": "missing"});
        let reply = message_handler(State(state), to_bytes(body)).await.unwrap();
        assert_eq!(reply.0, Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_message_is_ignored() {
        let state = test_state();

        let reply = message_handler(State(state.clone()), to_bytes(json!({"code": "other"})))
            .await
            .unwrap();
        assert_eq!(reply.0, Value::Null);

        let reply = message_handler(State(state.clone()), Bytes::from_static(b"not json"))
            .await
            .unwrap();
        assert_eq!(reply.0, Value::Null);

        let reply = message_handler(State(state), Bytes::new()).await.unwrap();
        assert_eq!(reply.0, Value::Null);
    }

    #[tokio::test]
    async fn test_set_invalid_key() {
        let state = test_state();

        let body = json!({"code": "set-cache", "key": "", "value": 1});
        let result = message_handler(State(state), to_bytes(body)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
