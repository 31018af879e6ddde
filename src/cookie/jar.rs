//! Cookie Jar Module
//!
//! Name-keyed cookie storage with browser semantics: assignments overwrite,
//! expired cookies read as absent, and only persistent cookies are saved.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::cookie::Cookie;
use crate::error::Result;

// == Cookie Jar ==
/// In-memory cookie store.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, Cookie>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    // == Write ==
    /// Stores a cookie, replacing any cookie with the same name.
    ///
    /// Writing an already expired cookie deletes the name instead.
    pub fn insert(&mut self, cookie: Cookie) {
        if cookie.is_expired() {
            self.cookies.remove(&cookie.name);
        } else {
            self.cookies.insert(cookie.name.clone(), cookie);
        }
    }

    /// Applies an assignment string, like writing to `document.cookie`.
    pub fn assign(&mut self, assignment: &str) -> Result<()> {
        let cookie = Cookie::parse_assignment(assignment)?;
        self.insert(cookie);
        Ok(())
    }

    // == Read ==
    /// Returns the live cookie named `name`.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.get_at(name, Utc::now())
    }

    /// Returns the cookie named `name` if it is live at `now`.
    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Option<&Cookie> {
        self.cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(now))
    }

    /// Renders live cookies as `a=1; b=2`, like reading `document.cookie`.
    pub fn header(&self) -> String {
        let now = Utc::now();
        self.cookies
            .values()
            .filter(|cookie| !cookie.is_expired_at(now))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    // == Purge ==
    /// Removes all expired cookies, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    /// Removes cookies expired at `now`.
    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|_, cookie| !cookie.is_expired_at(now));
        before - self.cookies.len()
    }

    /// Number of stored cookies, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    // == Persistence ==
    /// Loads a jar from a JSON cookie file.
    ///
    /// A missing or unparseable file yields an empty jar; the unparseable
    /// file is left in place and overwritten by the next save. Cookies that
    /// expired while the file sat on disk are dropped.
    pub fn load(path: &Path) -> Result<Self> {
        let mut jar = Self::new();
        if !path.exists() {
            debug!("Cookie file {} not found, starting empty", path.display());
            return Ok(jar);
        }

        let contents = fs::read_to_string(path)?;
        let cookies: Vec<Cookie> = match serde_json::from_str(&contents) {
            Ok(cookies) => cookies,
            Err(err) => {
                warn!(
                    "Cookie file {} is corrupt, starting empty: {}",
                    path.display(),
                    err
                );
                return Ok(jar);
            }
        };
        for cookie in cookies {
            jar.insert(cookie);
        }
        Ok(jar)
    }

    /// Writes persistent cookies to a JSON cookie file.
    ///
    /// Session cookies are not written. The file is replaced atomically: the
    /// jar is written to a sibling temp file which is then renamed over it.
    pub fn save(&self, path: &Path) -> Result<()> {
        let now = Utc::now();
        let persistent: Vec<&Cookie> = self
            .cookies
            .values()
            .filter(|cookie| !cookie.is_session() && !cookie.is_expired_at(now))
            .collect();

        let contents = serde_json::to_string_pretty(&persistent)?;
        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        fs::write(&temp, contents)?;
        fs::rename(&temp, path)?;
        Ok(())
    }
}
