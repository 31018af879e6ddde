//! Transport Module
//!
//! Carries request messages from a requester to the background context and
//! brings the reply back.
//!
//! # Implementors
//! - `ChannelTransport` - in-process queue feeding the listener task
//! - `HttpTransport` - `POST /message` against a running server

mod channel;
mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::CacheRequest;

pub use channel::{ChannelTransport, Envelope};
pub use http::HttpTransport;

/// A message channel to the cache store.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and waits for its reply.
    ///
    /// # Errors
    ///
    /// - `CacheError::Transport` if the message could not be delivered or
    ///   the reply was lost
    /// - `CacheError::InvalidRequest` if the store refused the request
    async fn send(&self, request: CacheRequest) -> Result<Option<Value>>;
}
