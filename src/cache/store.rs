//! Cache Store Module
//!
//! Background side of the cache: answers get-cache and set-cache messages
//! from a cookie jar, storing each value as a JSON-encoded cookie.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::cookie::{Cookie, CookieJar};
use crate::error::{CacheError, Result};
use crate::models::CacheRequest;

// == Cache Store ==
/// Cookie-backed cache answering request messages.
///
/// Each message is handled on its own; the jar is the only state.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Backing cookie storage
    jar: CookieJar,
    /// File persistent cookies are saved to after each change
    cookie_file: Option<PathBuf>,
}

impl CacheStore {
    // == Constructors ==
    /// Creates a store over an empty, memory-only jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a memory-only store over an existing jar.
    pub fn with_jar(jar: CookieJar) -> Self {
        Self {
            jar,
            cookie_file: None,
        }
    }

    /// Opens a store persisted to `path`, loading any cookies already there.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let jar = CookieJar::load(path)?;
        debug!("Loaded {} cookies from {}", jar.len(), path.display());
        Ok(Self {
            jar,
            cookie_file: Some(path.to_path_buf()),
        })
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.cookie_file {
            Some(path) => Self::open(path),
            None => Ok(Self::new()),
        }
    }

    // == Handle ==
    /// Handles one request message, returning the reply value.
    ///
    /// get-cache replies with the cached value or `None`; set-cache always
    /// replies `None` once the cookie is written.
    pub fn handle(&mut self, request: CacheRequest) -> Result<Option<Value>> {
        if let Some(error_msg) = request.validate() {
            return Err(CacheError::InvalidRequest(error_msg));
        }

        match request {
            CacheRequest::GetCache { key } => Ok(self.get(&key)),
            CacheRequest::SetCache {
                key,
                value,
                expiration,
            } => {
                self.set(key, &value, expiration)?;
                Ok(None)
            }
        }
    }

    // == Get ==
    /// Looks up `key` and decodes its cookie value.
    ///
    /// A missing cookie, an undecodable one, or a stored `null` all read as
    /// `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        let Some(cookie) = self.jar.get(key) else {
            debug!("CACHE: not found {}", key);
            return None;
        };

        match serde_json::from_str::<Value>(&cookie.value) {
            Ok(Value::Null) => None,
            Ok(value) => {
                debug!("CACHE: found {} {}", key, cookie.value);
                Some(value)
            }
            Err(err) => {
                warn!("CACHE: undecodable value for {}: {}", key, err);
                None
            }
        }
    }

    // == Set ==
    /// Writes `value` as JSON under `key`, living `expiration` days.
    ///
    /// No expiration (or zero) writes a session cookie. A negative one
    /// expires the key, the way a browser treats a negative max-age.
    pub fn set(&mut self, key: String, value: &Value, expiration: Option<f64>) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        let cookie = Cookie::for_days(key, encoded, expiration);
        if cookie.is_expired() {
            debug!("CACHE: expiring {}", cookie.name);
        } else {
            debug!("CACHE: setting {}", cookie.to_assignment());
        }

        self.jar.insert(cookie);
        self.persist();
        Ok(())
    }

    // == Purge Expired ==
    /// Removes expired cookies from the jar.
    ///
    /// Returns the number of cookies removed.
    pub fn purge_expired(&mut self) -> usize {
        let removed = self.jar.purge_expired();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Saves the jar when a cookie file is configured.
    ///
    /// A failed save leaves the in-memory value in place.
    fn persist(&self) {
        if let Some(path) = &self.cookie_file {
            if let Err(err) = self.jar.save(path) {
                warn!("Failed to save cookies to {}: {}", path.display(), err);
            }
        }
    }

    /// Read access to the backing jar.
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    /// Number of cookies held, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.jar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jar.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_get_nonexistent() {
        let store = CacheStore::new();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();

        store.set("stars".to_string(), &json!(42), None).unwrap();
        assert_eq!(store.get("stars"), Some(json!(42)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_preserves_json_types() {
        let mut store = CacheStore::new();

        store.set("s".to_string(), &json!("42"), None).unwrap();
        store.set("b".to_string(), &json!(true), None).unwrap();

        assert_eq!(store.get("s"), Some(json!("42")));
        assert_eq!(store.get("b"), Some(json!(true)));
    }

    #[test]
    fn test_store_cookie_format() {
        let mut store = CacheStore::new();

        store.set("name".to_string(), &json!("ann"), Some(1.0)).unwrap();
        store.set("count".to_string(), &json!(3), None).unwrap();

        let name = store.jar().get("name").unwrap();
        assert_eq!(name.to_assignment(), "name=\"ann\"; max-age=86400");
        let count = store.jar().get("count").unwrap();
        assert_eq!(count.to_assignment(), "count=3; max-age=");
    }

    #[test]
    fn test_store_zero_expiration_is_unbounded() {
        let mut store = CacheStore::new();

        store.set("k".to_string(), &json!(1), Some(0.0)).unwrap();
        let cookie = store.jar().get("k").unwrap();
        assert!(cookie.is_session());
        assert_eq!(cookie.max_age, None);
    }

    #[test]
    fn test_store_fractional_expiration() {
        let mut store = CacheStore::new();

        store
            .handle(CacheRequest::set_days("k", json!(1), Some(1.5)))
            .unwrap();
        assert_eq!(store.get("k"), Some(json!(1)));
        assert_eq!(store.jar().get("k").unwrap().max_age, Some(129_600));
    }

    #[test]
    fn test_store_negative_expiration_expires_key() {
        let mut store = CacheStore::new();

        store.set("k".to_string(), &json!(1), None).unwrap();
        store
            .handle(CacheRequest::set_days("k", json!(2), Some(-1.0)))
            .unwrap();
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new();

        store.set("k".to_string(), &json!("v1"), None).unwrap();
        store.set("k".to_string(), &json!("v2"), Some(3.0)).unwrap();

        assert_eq!(store.get("k"), Some(json!("v2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_value_with_separators() {
        let mut store = CacheStore::new();
        let value = json!("a=b; c=d");

        store.set("k".to_string(), &value, None).unwrap();
        assert_eq!(store.get("k"), Some(value));
    }

    #[test]
    fn test_store_undecodable_cookie_reads_as_none() {
        let mut jar = CookieJar::new();
        jar.assign("raw=not-json; max-age=").unwrap();
        let store = CacheStore::with_jar(jar);

        assert_eq!(store.get("raw"), None);
    }

    #[test]
    fn test_store_null_reads_as_none() {
        let mut store = CacheStore::new();
        store.set("k".to_string(), &Value::Null, None).unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_handle_get_and_set() {
        let mut store = CacheStore::new();

        let reply = store
            .handle(CacheRequest::set("k", json!("v"), Some(1)))
            .unwrap();
        assert_eq!(reply, None);

        let reply = store.handle(CacheRequest::get("k")).unwrap();
        assert_eq!(reply, Some(json!("v")));
    }

    #[test]
    fn test_handle_rejects_invalid_key() {
        let mut store = CacheStore::new();

        let result = store.handle(CacheRequest::set("bad key", json!(1), None));
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_purge_expired() {
        let mut jar = CookieJar::new();
        jar.insert(Cookie::new("live", "1").with_max_age(3600));
        jar.insert(Cookie::new("dead", "1").with_max_age(1));
        let mut store = CacheStore::with_jar(jar);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.get("dead"), None);
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_open_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        {
            let mut store = CacheStore::open(&path).unwrap();
            store.set("kept".to_string(), &json!([1, 2]), Some(1.0)).unwrap();
            store.set("session".to_string(), &json!(2), None).unwrap();
        }

        let store = CacheStore::open(&path).unwrap();
        assert_eq!(store.get("kept"), Some(json!([1, 2])));
        assert_eq!(store.get("session"), None);
    }
}
