//! API Handlers
//!
//! HTTP request handlers exposing each cache operation.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheItem, TtlCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, GetResponse, HealthResponse, PutRequest,
    PutResponse, StaleResponse, StatsResponse,
};
use crate::storage::{BoxedStorage, FileStorage, JsonCodec, MemoryStorage};

/// Cache of arbitrary JSON documents keyed by string.
pub type JsonCache = TtlCache<String, Value, BoxedStorage<String, CacheItem<Value>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The served cache; it owns its own lock
    pub cache: Arc<JsonCache>,
}

impl AppState {
    /// Creates a new AppState around an already built cache.
    pub fn new(cache: JsonCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Builds a file-backed cache on the system clock from configuration.
    pub fn from_config(config: &Config) -> Self {
        let storage: FileStorage<String, CacheItem<Value>, JsonCodec<CacheItem<Value>>> =
            FileStorage::new(&config.cache_dir, JsonCodec::new());
        let storage: BoxedStorage<String, CacheItem<Value>> = if config.hashed_file_names {
            Box::new(storage.hashed())
        } else {
            Box::new(storage)
        };
        Self::new(TtlCache::with_system_clock(config.ttl(), storage))
    }

    /// Builds a memory-backed cache on the system clock.
    pub fn in_memory(ttl: Duration) -> Self {
        let storage: BoxedStorage<String, CacheItem<Value>> = Box::new(MemoryStorage::new());
        Self::new(TtlCache::with_system_clock(ttl, storage))
    }
}

fn checked_key(key: String) -> Result<String> {
    match validate_key(&key) {
        Some(error_msg) => Err(ApiError::InvalidRequest(error_msg)),
        None => Ok(key),
    }
}

/// Handler for PUT /entries/:key
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    let key = checked_key(key)?;
    state.cache.put(&key, req.value).await;

    Ok(Json(PutResponse::new(key)))
}

/// Handler for GET /entries/:key
///
/// Absent and expired entries are both reported as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let key = checked_key(key)?;
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for GET /entries/:key/stale
pub async fn stale_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<StaleResponse>> {
    let key = checked_key(key)?;
    let stale = state.cache.is_stale(&key).await;

    Ok(Json(StaleResponse::new(key, stale)))
}

/// Handler for DELETE /entries/:key
///
/// Succeeds whether or not the key was present.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let key = checked_key(key)?;
    state.cache.remove(&key).await;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /entries
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(&stats, state.cache.ttl().as_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
