//! Cache Module
//!
//! In-memory page cache with a size bound, LRU eviction and lazy TTL expiration.

mod clock;
mod entry;
mod lru;
mod notifier;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, PagePayload, PreserveKeyword, PreserveOption, ScrollRegion};
pub use lru::least_recently_updated;
pub use notifier::{CacheSnapshot, ChangeListener, ChangeNotifier, SubscriptionId};
pub use policy::{timestamp_after, CachePolicy};
pub use stats::CacheStats;
pub use store::PageCacheStore;

// == Public Constants ==
/// Default maximum number of cached pages
pub const DEFAULT_SIZE_LIMIT: usize = 20;

/// Default lifetime of a cached page, in minutes
pub const DEFAULT_DURATION_MINUTES: f64 = 1.0;
