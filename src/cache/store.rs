//! Cache Store Module
//!
//! The entry store: key to page entry mapping with a size bound,
//! least-recently-updated eviction and lazy expiration on read.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::lru::least_recently_updated;
use crate::cache::policy::timestamp_after;
use crate::cache::{
    CacheEntry, CachePolicy, CacheSnapshot, CacheStats, ChangeNotifier, Clock, SubscriptionId,
    SystemClock, DEFAULT_SIZE_LIMIT,
};

// == Page Cache Store ==
/// In-memory page cache.
///
/// Expiration is checked lazily by [`get`](Self::get); there is no sweeper.
#[derive(Debug)]
pub struct PageCacheStore {
    /// Cached pages by host-relative key
    entries: HashMap<String, CacheEntry>,
    /// Enable flag and ignore list
    policy: CachePolicy,
    /// Listeners told about every mutation
    notifier: ChangeNotifier,
    stats: CacheStats,
    /// Maximum number of entries, at least 1
    size_limit: usize,
    clock: Arc<dyn Clock>,
}

impl Default for PageCacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_LIMIT)
    }
}

impl PageCacheStore {
    // == Constructors ==
    /// Creates a store holding at most `size_limit` entries, on the system clock.
    pub fn new(size_limit: usize) -> Self {
        Self::with_clock(size_limit, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(size_limit: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            policy: CachePolicy::default(),
            notifier: ChangeNotifier::new(),
            stats: CacheStats::new(),
            size_limit: size_limit.max(1),
            clock,
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// Refused (returns false, nothing changes) when caching is disabled or
    /// the key is ignored. Inserting a new key into a full store first evicts
    /// the least recently updated entry; overwriting never evicts.
    pub fn set(&mut self, key: impl Into<String>, entry: CacheEntry) -> bool {
        let key = key.into();
        if !self.policy.should_cache(&key) {
            debug!(key = %key, "cache write refused by policy");
            self.stats.record_rejected_write();
            return false;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.size_limit {
            if let Some(victim) = least_recently_updated(&self.entries) {
                self.entries.remove(&victim);
                self.stats.record_eviction();
                debug!(key = %victim, "evicted least recently updated page");
            }
        }

        self.entries.insert(key, entry);
        self.changed();
        true
    }

    // == Set With Expiration ==
    /// Like [`set`](Self::set), stamping `expires_at` to `minutes` from now.
    pub fn set_with_expiration(
        &mut self,
        key: impl Into<String>,
        entry: CacheEntry,
        minutes: f64,
    ) -> bool {
        let expires_at = self.get_timestamp(minutes);
        self.set(key, CacheEntry { expires_at, ..entry })
    }

    // == Get ==
    /// Reads `key`, refreshing its recency.
    ///
    /// Returns None when caching is disabled, the key is ignored, or absent.
    /// A resolved entry past its expiry is dropped and None is returned;
    /// pending placeholders are returned even when past expiry.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        if !self.policy.should_cache(key) {
            self.stats.record_miss();
            return None;
        }

        let now = self.clock.now();
        let stale = match self.entries.get(key) {
            Some(entry) => entry.is_stale_on_read(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if stale {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            debug!(key = %key, "dropped expired page");
            self.changed();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.updated_at = Some(now);
        self.stats.record_hit();
        Some(entry.clone())
    }

    // == Has ==
    /// Membership check without side effects or expiration.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Deletes `key` if present. Listeners are notified either way.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.remove(key);
        self.changed();
        removed
    }

    // == Remove All ==
    /// Deletes every entry.
    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.changed();
    }

    // == All ==
    /// Snapshot of every entry, ordered by key.
    pub fn all(&self) -> CacheSnapshot {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    // == Policy ==
    /// Never cache or serve these keys.
    ///
    /// Existing entries for them stay in place until a write, removal or
    /// eviction touches them.
    pub fn ignore<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.ignore(urls);
    }

    /// Takes keys off the ignore list.
    pub fn accept<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.accept(urls)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.policy.set_enabled(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.is_enabled()
    }

    pub fn should_cache(&self, key: &str) -> bool {
        self.policy.should_cache(key)
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    // == Time ==
    /// Current time on the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Instant `minutes` from now; used for every TTL.
    pub fn get_timestamp(&self, minutes: f64) -> DateTime<Utc> {
        timestamp_after(self.clock.now(), minutes)
    }

    // == Subscriptions ==
    /// Registers a change listener. It runs after every mutation with the
    /// full snapshot and must not call back into the store.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CacheSnapshot) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_limit(&self) -> usize {
        self.size_limit
    }

    fn changed(&mut self) {
        self.stats.set_total_entries(self.entries.len());
        if self.notifier.has_listeners() {
            self.notifier.notify(&self.all());
        }
    }
}
