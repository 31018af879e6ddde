//! Background Tasks Module
//!
//! Contains the task that plays the background context.
//!
//! # Tasks
//! - Cache store listener: answers request messages and purges expired cookies

mod listener;

pub use listener::{spawn_cache_store, stop_cache_store};
