//! Message models for the cache
//!
//! Defines the message envelope exchanged between requesters and the
//! background context, and the HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::CacheRequest;
pub use responses::HealthResponse;
