//! Article Cache - TTL caching with pluggable persistence
//!
//! A generic, lock-serialized cache that timestamps entries with an injected
//! clock and expires them lazily on read, over storage backends that know
//! nothing about time.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod storage;

pub use api::AppState;
pub use cache::{CacheItem, TtlCache};
pub use config::Config;
pub use storage::{FileStorage, JsonCodec, MemoryStorage, Storage};
