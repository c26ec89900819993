//! API Module
//!
//! HTTP handlers and routing for inspecting and driving one JSON cache.
//!
//! # Endpoints
//! - `PUT /entries/:key` - Cache a JSON value
//! - `GET /entries/:key` - Read a fresh value
//! - `DELETE /entries/:key` - Remove a key
//! - `GET /entries/:key/stale` - Staleness check
//! - `DELETE /entries` - Clear the cache
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
