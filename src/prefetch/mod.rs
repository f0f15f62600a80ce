//! Prefetch Module
//!
//! Speculative page fetching into the cache: key derivation, the transport
//! seam and the engine coordinating placeholders, version retries and
//! fragment reconciliation.

mod engine;
mod options;
pub mod transport;
pub mod url;

pub use engine::{CacheEngine, PrefetchOutcome};
pub use options::{PrefetchOptions, PrefetchTarget};
pub use transport::{HttpTransport, PageRequest, PageResponse, PageTransport};
