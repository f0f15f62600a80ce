//! Request and Response models for the diagnostics API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{EnabledRequest, KeyQuery, PrefetchRequest, UrlListRequest, VersionRequest};
pub use responses::{
    CacheListResponse, EntryResponse, EntrySummary, HealthResponse, MessageResponse,
    PolicyResponse, StatsResponse,
};
