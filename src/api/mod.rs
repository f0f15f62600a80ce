//! API Module
//!
//! HTTP handlers and routing for the cache diagnostics server.
//!
//! # Endpoints
//! - `GET /cache` / `DELETE /cache` - List or clear cached pages
//! - `GET /cache/entry?key=` / `DELETE /cache/entry?key=` - One cached page
//! - `GET /cache/stats` - Cache statistics
//! - `POST /prefetch` - Start a prefetch
//! - `GET /policy`, `PUT /ignore`, `PUT /accept`, `PUT /version`, `PUT /enabled`
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
