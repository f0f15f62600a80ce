//! Prefetch options.

use serde::Deserialize;

use crate::cache::DEFAULT_DURATION_MINUTES;

/// Per-call prefetch settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrefetchOptions {
    /// Lifetime of the resolved entry
    pub duration_in_minutes: f64,
    /// Fetch the cacheable, non-personalized variant of the page
    pub is_static: bool,
}

impl Default for PrefetchOptions {
    fn default() -> Self {
        Self {
            duration_in_minutes: DEFAULT_DURATION_MINUTES,
            is_static: false,
        }
    }
}

impl PrefetchOptions {
    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration_in_minutes = minutes;
        self
    }

    pub fn static_variant(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// One entry of a batch prefetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefetchTarget {
    pub href: String,
    pub options: PrefetchOptions,
}

impl PrefetchTarget {
    pub fn new(href: impl Into<String>, options: PrefetchOptions) -> Self {
        Self {
            href: href.into(),
            options,
        }
    }
}

impl From<&str> for PrefetchTarget {
    fn from(href: &str) -> Self {
        Self::new(href, PrefetchOptions::default())
    }
}

impl From<String> for PrefetchTarget {
    fn from(href: String) -> Self {
        Self::new(href, PrefetchOptions::default())
    }
}
