//! Cache Store Listener
//!
//! The background context: a single task that owns the cache store, answers
//! request messages one at a time and periodically purges expired cookies.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::transport::{ChannelTransport, Envelope};

/// Moves `store` into a background task and returns a transport to it.
///
/// Messages are handled strictly in arrival order, so the store needs no
/// locking. Between messages the task purges expired cookies every
/// `purge_interval_secs` seconds. The task ends, handing the store back
/// through the `JoinHandle`, once every transport clone has been dropped.
///
/// # Arguments
/// * `store` - The cache store to serve
/// * `purge_interval_secs` - Interval in seconds between purges (minimum 1)
/// * `capacity` - Depth of the message queue (minimum 1)
///
/// # Example
/// ```ignore
/// let (transport, handle) = spawn_cache_store(CacheStore::new(), 60, 64);
/// let cache = Cache::new(transport);
/// cache.set("stars", &42, Some(1)).await?;
/// ```
pub fn spawn_cache_store(
    mut store: CacheStore,
    purge_interval_secs: u64,
    capacity: usize,
) -> (ChannelTransport, JoinHandle<CacheStore>) {
    let (sender, mut receiver) = mpsc::channel::<Envelope>(capacity.max(1));
    let period = Duration::from_secs(purge_interval_secs.max(1));

    let handle = tokio::spawn(async move {
        info!(
            "Cache store listening, purging expired cookies every {} seconds",
            period.as_secs()
        );

        let mut purge = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        purge.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                envelope = receiver.recv() => {
                    let Some(Envelope { request, reply }) = envelope else {
                        info!("All requesters gone, cache store stopping");
                        break;
                    };

                    let result = store.handle(request);
                    if reply.send(result).is_err() {
                        debug!("Requester went away before its reply was sent");
                    }
                }
                _ = purge.tick() => {
                    let removed = store.purge_expired();
                    if removed > 0 {
                        info!("Cookie purge: removed {} expired cookies", removed);
                    } else {
                        debug!("Cookie purge: no expired cookies found");
                    }
                    debug!("Live cookies: {}", store.jar().header());
                }
            }
        }

        store
    });

    (ChannelTransport::new(sender), handle)
}

/// Waits up to `grace` for the listener to finish and hands back its store.
///
/// The listener only stops once every transport is dropped, so call this
/// after the server has stopped accepting requests. If some transport is
/// still alive when `grace` runs out, the task is aborted and `None` is
/// returned.
pub async fn stop_cache_store(
    mut handle: JoinHandle<CacheStore>,
    grace: Duration,
) -> Option<CacheStore> {
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(Ok(store)) => Some(store),
        Ok(Err(err)) => {
            warn!("Cache store listener failed: {}", err);
            None
        }
        Err(_) => {
            handle.abort();
            warn!(
                "Cache store listener still busy after {:?}, aborted",
                grace
            );
            None
        }
    }
}
