//! In-process channel transport.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use super::Transport;
use crate::error::{CacheError, Result};
use crate::models::CacheRequest;

/// A request paired with the slot its reply goes into.
#[derive(Debug)]
pub struct Envelope {
    pub request: CacheRequest,
    pub reply: oneshot::Sender<Result<Option<Value>>>,
}

/// Sending half of the listener's message queue.
///
/// Cheap to clone; the listener stops once every clone is dropped.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<Envelope>,
}

impl ChannelTransport {
    pub fn new(sender: mpsc::Sender<Envelope>) -> Self {
        Self { sender }
    }

    /// Returns true once the listener has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, request: CacheRequest) -> Result<Option<Value>> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope { request, reply })
            .await
            .map_err(|_| CacheError::Transport("cache store is not running".to_string()))?;

        response
            .await
            .map_err(|_| CacheError::Transport("cache store dropped the reply".to_string()))?
    }
}
