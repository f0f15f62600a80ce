//! Cache Policy Module
//!
//! Global enable flag, ignore list and TTL timestamp computation.

use chrono::{DateTime, Duration, Utc};

// == Cache Policy ==
/// Decides whether a key may be cached or served from cache.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    enabled: bool,
    /// Keys that are never cached; duplicates are allowed
    ignored: Vec<String>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CachePolicy {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ignored: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // == Should Cache ==
    /// `enabled && key not ignored`.
    pub fn should_cache(&self, key: &str) -> bool {
        self.enabled && !self.is_ignored(key)
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == key)
    }

    // == Ignore ==
    /// Appends keys to the ignore list.
    pub fn ignore<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored.extend(urls.into_iter().map(Into::into));
    }

    // == Accept ==
    /// Removes every occurrence of the given keys from the ignore list.
    ///
    /// Returns the number of list items removed.
    pub fn accept<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted: Vec<S> = urls.into_iter().collect();
        let before = self.ignored.len();
        self.ignored
            .retain(|ignored| !accepted.iter().any(|url| url.as_ref() == ignored));
        before - self.ignored.len()
    }

    /// Current ignore list, in insertion order.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }
}

// == Timestamp ==
/// Returns `now + minutes`, with millisecond resolution.
///
/// Fractional minutes are honoured; negative values yield instants in the past.
/// Offsets past the representable range saturate at the calendar bounds.
pub fn timestamp_after(now: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    let millis = (minutes * 60_000.0).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|offset| now.checked_add_signed(offset))
        .unwrap_or(if millis < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}
