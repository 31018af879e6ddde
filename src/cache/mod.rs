//! Cache Module
//!
//! The two halves of the cookie cache: the requester-side client and the
//! background-side store.

mod client;
mod store;


// Re-export public types
pub use client::Cache;
pub use store::CacheStore;
