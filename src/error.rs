//! Error types for the cookie cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cookie cache.
///
/// Missing or undecodable values are not errors: they resolve to `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Request cannot be applied to the cookie store
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Assignment string could not be parsed as a cookie
    #[error("Invalid cookie: {0}")]
    InvalidCookie(String),

    /// Message could not be delivered or its reply was lost
    #[error("Transport error: {0}")]
    Transport(String),

    /// Value could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cookie file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Transport(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::InvalidCookie(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Serialization(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            CacheError::Transport(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cookie cache.
pub type Result<T> = std::result::Result<T, CacheError>;
