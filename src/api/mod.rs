//! API Module
//!
//! HTTP surface of the background context.
//!
//! # Endpoints
//! - `POST /message` - Deliver a get-cache or set-cache message
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
