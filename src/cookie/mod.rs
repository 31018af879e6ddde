//! Cookie Module
//!
//! Browser-style cookie storage backing the cache.

mod entry;
mod jar;

// Re-export public types
pub use entry::{is_valid_name, max_age_for_days, Cookie, SECONDS_PER_DAY};
pub use jar::CookieJar;
