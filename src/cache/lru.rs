//! LRU Module
//!
//! Picks the eviction victim by oldest `updated_at`.
//!
//! Entries never read or written through the recency path carry no
//! `updated_at` and rank as if updated at the epoch, so they go first.
//! Ties fall back to key order, which keeps the choice deterministic
//! regardless of map iteration order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::CacheEntry;

// == Recency Rank ==
/// Recency used for eviction ordering; `None` ranks oldest.
pub fn recency(entry: &CacheEntry) -> DateTime<Utc> {
    entry.updated_at.unwrap_or_default()
}

// == Least Recently Updated ==
/// Returns the key of the least recently updated entry.
///
/// Returns None if `entries` is empty.
pub fn least_recently_updated(entries: &HashMap<String, CacheEntry>) -> Option<String> {
    entries
        .iter()
        .min_by(|(a_key, a), (b_key, b)| {
            recency(a)
                .cmp(&recency(b))
                .then_with(|| a_key.cmp(b_key))
        })
        .map(|(key, _)| key.clone())
}
