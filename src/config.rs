//! Configuration Module
//!
//! Loads the background context's settings from environment variables.

use std::env;
use std::path::PathBuf;

/// Background context configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between expired-cookie purges
    pub purge_interval: u64,
    /// Depth of the listener's message queue
    pub channel_capacity: usize,
    /// JSON file holding persistent cookies, None = memory only
    pub cookie_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PURGE_INTERVAL` - Purge frequency in seconds (default: 60)
    /// - `CHANNEL_CAPACITY` - Listener queue depth (default: 64)
    /// - `COOKIE_FILE` - Path of the cookie file (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            purge_interval: parse_var("PURGE_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.purge_interval),
            channel_capacity: parse_var("CHANNEL_CAPACITY")
                .filter(|cap| *cap > 0)
                .unwrap_or(defaults.channel_capacity),
            cookie_file: env::var("COOKIE_FILE")
                .ok()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            purge_interval: 60,
            channel_capacity: 64,
            cookie_file: None,
        }
    }
}
