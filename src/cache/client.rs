//! Cache Client Module
//!
//! Requester side of the cache: typed get / set / get-or-compute over any
//! transport to the background context.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::CacheRequest;
use crate::transport::Transport;

// == Cache ==
/// Requester handle for the cookie cache.
#[derive(Debug, Clone)]
pub struct Cache<T> {
    transport: T,
}

impl<T: Transport> Cache<T> {
    /// Creates a cache client sending messages over `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // == Get ==
    /// Fetches the value cached under `key`.
    ///
    /// Returns `Ok(None)` when nothing is cached, or when the cached value
    /// does not decode as `V`. Only transport failures are errors.
    pub async fn get<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        let reply = self.transport.send(CacheRequest::get(key)).await?;

        Ok(reply.and_then(|value| match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!("Cached value for {} has an unexpected shape: {}", key, err);
                None
            }
        }))
    }

    // == Set ==
    /// Caches `value` under `key` for `expiration` days.
    ///
    /// `None` or `Some(0)` stores without a time limit. Resolves once the
    /// store has acknowledged the write.
    pub async fn set<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        expiration: Option<u64>,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.transport
            .send(CacheRequest::set(key, value, expiration))
            .await?;
        Ok(())
    }

    // == Get Or Compute ==
    /// Returns the cached value, or computes, caches and returns it.
    ///
    /// `getter` runs only on a miss. A `None` from the getter is returned
    /// as-is and nothing is written. Concurrent misses on the same key are
    /// not coalesced: each caller runs its getter and the last write wins.
    pub async fn get_set<V, F, Fut>(
        &self,
        key: &str,
        getter: F,
        expiration: Option<u64>,
    ) -> Result<Option<V>>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<V>>,
    {
        if let Some(cached) = self.get(key).await? {
            return Ok(Some(cached));
        }

        let value = getter().await;
        if let Some(value) = &value {
            self.set(key, value, expiration).await?;
        }
        Ok(value)
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
