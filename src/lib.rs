//! Page Prefetch Cache - client-side page-response cache
//!
//! Maps navigation targets to fetched page payloads with a size bound,
//! least-recently-updated eviction, lazy TTL expiration and speculative
//! prefetching.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod prefetch;

pub use api::AppState;
pub use cache::{CacheEntry, CacheSnapshot, PageCacheStore, PagePayload};
pub use config::Config;
pub use prefetch::{CacheEngine, HttpTransport, PageTransport, PrefetchOptions};
