//! Cache Entry Module
//!
//! Defines the page payload and the cache entry wrapping it with TTL and
//! recency metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Page Payload ==
/// A page response as returned by the backend.
///
/// Opaque to the cache except for `url`, which prefetching may rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePayload {
    /// Component identifier to render
    pub component: String,
    /// Component props
    #[serde(default)]
    pub props: Value,
    /// Canonical URL of the page
    pub url: String,
    /// Protocol version the page was rendered for
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scroll_regions: Vec<ScrollRegion>,
    #[serde(default)]
    pub remembered_state: Map<String, Value>,
}

impl PagePayload {
    /// Creates a payload with empty props and state.
    pub fn new(component: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: Value::Object(Map::new()),
            url: url.into(),
            version: None,
            scroll_regions: Vec::new(),
            remembered_state: Map::new(),
        }
    }

    /// Neutral payload carried by a pending placeholder.
    pub fn placeholder() -> Self {
        Self::new("", "")
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props = props;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// True when the backend flagged this page as a static variant
    /// (`props.static == true`).
    pub fn is_static(&self) -> bool {
        self.props
            .get("static")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Saved scroll offset of one scrollable region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollRegion {
    pub top: f64,
    pub left: f64,
}

// == Preserve Option ==
/// Navigation hint: a flag, or the `"errors"` keyword meaning
/// "preserve only when the page carries validation errors".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreserveOption {
    Flag(bool),
    Keyword(PreserveKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreserveKeyword {
    Errors,
}

// == Cache Entry ==
/// One cached navigation target.
///
/// The navigation hints (`visit_id`, `replace`, `preserve_scroll`,
/// `preserve_state`) are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The fetched page
    pub page_response: PagePayload,
    /// True while this entry is a placeholder for an in-flight prefetch
    #[serde(default)]
    pub pending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_scroll: Option<PreserveOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_state: Option<PreserveOption>,
    /// Instant after which the entry is stale
    pub expires_at: DateTime<Utc>,
    /// Last successful read or write; the eviction recency signal
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructors ==
    /// Creates a resolved entry for `page` expiring at `expires_at`.
    pub fn new(page: PagePayload, expires_at: DateTime<Utc>) -> Self {
        Self {
            page_response: page,
            pending: false,
            visit_id: None,
            replace: None,
            preserve_scroll: None,
            preserve_state: None,
            expires_at,
            updated_at: None,
        }
    }

    /// Creates a pending placeholder for an in-flight prefetch.
    pub fn placeholder(expires_at: DateTime<Utc>) -> Self {
        Self {
            pending: true,
            ..Self::new(PagePayload::placeholder(), expires_at)
        }
    }

    pub fn with_visit_id(mut self, visit_id: Value) -> Self {
        self.visit_id = Some(visit_id);
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = Some(replace);
        self
    }

    pub fn with_preserve_scroll(mut self, option: PreserveOption) -> Self {
        self.preserve_scroll = Some(option);
        self
    }

    pub fn with_preserve_state(mut self, option: PreserveOption) -> Self {
        self.preserve_state = Some(option);
        self
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Strict comparison: an entry is still fresh at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    // == Is Evictable On Read ==
    /// Whether a read at `now` should drop this entry.
    ///
    /// Pending placeholders are never dropped by the read path.
    pub fn is_stale_on_read(&self, now: DateTime<Utc>) -> bool {
        !self.pending && self.is_expired(now)
    }

    // == Is Live ==
    /// Whether the entry is usable: resolved and not expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.pending && !self.is_expired(now)
    }

    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_milliseconds().max(0)
    }
}
