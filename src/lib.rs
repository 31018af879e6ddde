//! Cookie Cache - a cross-context cache backed by cookies
//!
//! Requesters send get-cache / set-cache messages to a background context,
//! which keeps each value as a JSON-encoded cookie with an optional
//! expiration in days.

pub mod api;
pub mod cache;
pub mod config;
pub mod cookie;
pub mod error;
pub mod models;
pub mod tasks;
pub mod transport;

pub use api::AppState;
pub use cache::{Cache, CacheStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_cache_store, stop_cache_store};
pub use transport::{ChannelTransport, HttpTransport, Transport};
