//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{CacheEntry, CacheSnapshot, CacheStats};

/// One row of the cache listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub key: String,
    pub pending: bool,
    pub url: String,
    pub component: String,
    /// Resolved and not yet expired
    pub live: bool,
    pub ttl_remaining_ms: i64,
    pub expires_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl EntrySummary {
    pub fn new(key: impl Into<String>, entry: &CacheEntry, now: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            pending: entry.pending,
            url: entry.page_response.url.clone(),
            component: entry.page_response.component.clone(),
            live: entry.is_live(now),
            ttl_remaining_ms: entry.ttl_remaining_ms(now),
            expires_at: entry.expires_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Response body for GET /cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheListResponse {
    pub entries: Vec<EntrySummary>,
    pub total: usize,
}

impl CacheListResponse {
    /// Builds the listing from a snapshot, keeping its key order.
    pub fn from_snapshot(snapshot: &CacheSnapshot, now: DateTime<Utc>) -> Self {
        let entries: Vec<_> = snapshot
            .iter()
            .map(|(key, entry)| EntrySummary::new(key.clone(), entry, now))
            .collect();
        Self {
            total: entries.len(),
            entries,
        }
    }
}

/// Response body for GET /cache/entry
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub entry: CacheEntry,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, entry: CacheEntry) -> Self {
        Self {
            key: key.into(),
            entry,
        }
    }
}

/// Generic acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the policy endpoints
#[derive(Debug, Clone, Serialize)]
pub struct PolicyResponse {
    pub enabled: bool,
    pub ignored: Vec<String>,
    pub version: Option<String>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
