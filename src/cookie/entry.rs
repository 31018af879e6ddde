//! Cookie Entry Module
//!
//! A single cookie with browser expiry semantics, and the
//! `name=value; max-age=N` assignment format used to write it.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Number of seconds in one day of cache expiration.
pub const SECONDS_PER_DAY: u64 = 86_400;

// == Cookie ==
/// A named cookie value with optional expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Raw cookie value
    pub value: String,
    /// Max-age in seconds as written, None = session cookie
    pub max_age: Option<u64>,
    /// Absolute expiry derived when the cookie was written
    pub expires_at: Option<DateTime<Utc>>,
}

impl Cookie {
    // == Constructors ==
    /// Creates a session cookie (no expiry).
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: None,
            expires_at: None,
        }
    }

    /// Creates a cookie that lives for `days` days.
    ///
    /// Fractional days are allowed. `None`, `Some(0.0)` and NaN produce a
    /// session cookie; a negative expiration produces an already expired
    /// cookie, which deletes the name when written to a jar.
    pub fn for_days(name: impl Into<String>, value: impl Into<String>, days: Option<f64>) -> Self {
        let cookie = Self::new(name, value);
        match max_age_for_days(days) {
            None => cookie,
            Some(seconds) if seconds <= 0 => cookie.expired(),
            Some(seconds) => cookie.with_max_age(seconds as u64),
        }
    }

    /// Sets the max-age and derives the absolute expiry from now.
    ///
    /// Expiry is capped at the end of year 9999 so it stays writable to a
    /// cookie file.
    pub fn with_max_age(mut self, seconds: u64) -> Self {
        let latest = latest_expiry();
        self.max_age = Some(seconds);
        self.expires_at = Some(
            i64::try_from(seconds)
                .ok()
                .and_then(Duration::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
                .map_or(latest, |expires| expires.min(latest)),
        );
        self
    }

    /// Marks the cookie as expired now, like `max-age=0`.
    pub fn expired(mut self) -> Self {
        self.max_age = Some(0);
        self.expires_at = Some(Utc::now());
        self
    }

    // == Expiry ==
    /// Returns true if the cookie has no expiry.
    pub fn is_session(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Checks expiry against a given instant.
    ///
    /// A cookie is expired once `now` reaches its expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    /// Checks expiry against the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    // == Assignment Format ==
    /// Renders the cookie as `name=value; max-age=<seconds|empty>`.
    pub fn to_assignment(&self) -> String {
        let max_age = self.max_age.map(|s| s.to_string()).unwrap_or_default();
        format!("{}={}; max-age={}", self.name, self.value, max_age)
    }

    /// Parses an assignment string such as `key="value"; max-age=86400`.
    ///
    /// The pair ends at the first `;`. `max-age` wins over `expires`; an empty
    /// max-age means a session cookie and a non-positive one expires the cookie
    /// immediately. Unknown attributes and unparseable attribute values are
    /// ignored.
    pub fn parse_assignment(input: &str) -> Result<Self> {
        let (pair, attributes) = input.split_once(';').unwrap_or((input, ""));
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| CacheError::InvalidCookie(format!("missing '=' in {:?}", pair)))?;

        let name = name.trim();
        if !is_valid_name(name) {
            return Err(CacheError::InvalidCookie(format!(
                "invalid cookie name {:?}",
                name
            )));
        }

        let mut cookie = Cookie::new(name, value.trim());
        let mut has_max_age = false;

        for attribute in attributes.split(';') {
            let (key, val) = attribute.split_once('=').unwrap_or((attribute, ""));
            let val = val.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "max-age" => {
                    if val.is_empty() {
                        continue;
                    }
                    let Ok(seconds) = val.parse::<i64>() else {
                        continue;
                    };
                    has_max_age = true;
                    if seconds <= 0 {
                        cookie = cookie.expired();
                    } else {
                        cookie = cookie.with_max_age(seconds as u64);
                    }
                }
                "expires" if !has_max_age => {
                    if let Ok(date) = DateTime::parse_from_rfc2822(val) {
                        cookie.expires_at = Some(date.with_timezone(&Utc));
                    }
                }
                _ => {}
            }
        }

        Ok(cookie)
    }
}

// == Utility Functions ==
/// Converts an expiration in days into a max-age in seconds.
///
/// `None`, zero and NaN mean no max-age constraint. Seconds are rounded to
/// the nearest whole second and saturate at the `i64` range; a non-positive
/// result means the cookie expires immediately.
pub fn max_age_for_days(days: Option<f64>) -> Option<i64> {
    days.filter(|d| *d != 0.0 && !d.is_nan())
        .map(|d| (d * SECONDS_PER_DAY as f64).round() as i64)
}

fn latest_expiry() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Returns true if `name` can be used as a cookie name.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '=' | ';' | ','))
}
