//! Request messages for the cache store
//!
//! Defines the message envelope a requester sends to the background context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cookie::is_valid_name;

/// Message envelope, tagged by its `code` field.
///
/// ```json
/// {"code": "get-cache", "key": "repo-stars"}
/// {"code": "set-cache", "key": "repo-stars", "value": 42, "expiration": 7}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum CacheRequest {
    /// Read the value cached under `key`
    GetCache {
        /// The cache key
        key: String,
    },
    /// Cache `value` under `key`
    SetCache {
        /// The cache key
        key: String,
        /// The value to store, JSON-encoded into the cookie
        #[serde(default)]
        value: Value,
        /// Optional time-to-live in days; any JSON number, a non-positive
        /// one expires the key
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expiration: Option<f64>,
    },
}

impl CacheRequest {
    /// Builds a get-cache message.
    pub fn get(key: impl Into<String>) -> Self {
        CacheRequest::GetCache { key: key.into() }
    }

    /// Builds a set-cache message living a whole number of days.
    pub fn set(key: impl Into<String>, value: Value, expiration: Option<u64>) -> Self {
        Self::set_days(key, value, expiration.map(|days| days as f64))
    }

    /// Builds a set-cache message with any expiration in days.
    pub fn set_days(key: impl Into<String>, value: Value, expiration: Option<f64>) -> Self {
        CacheRequest::SetCache {
            key: key.into(),
            value,
            expiration,
        }
    }

    /// The key this message addresses.
    pub fn key(&self) -> &str {
        match self {
            CacheRequest::GetCache { key } => key,
            CacheRequest::SetCache { key, .. } => key,
        }
    }

    /// Wire name of the message kind.
    pub fn code(&self) -> &'static str {
        match self {
            CacheRequest::GetCache { .. } => "get-cache",
            CacheRequest::SetCache { .. } => "set-cache",
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid. Only
    /// writes are checked: a key that can never be written simply misses.
    pub fn validate(&self) -> Option<String> {
        match self {
            CacheRequest::SetCache { key, .. } if !is_valid_name(key) => Some(format!(
                "Key {:?} cannot be used as a cookie name",
                key
            )),
            _ => None,
        }
    }
}
