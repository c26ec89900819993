//! Request DTOs for the inspection API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes.
///
/// Matches the usual file name limit (NAME_MAX). Sanitized names are never
/// longer than the key, so every accepted key fits in a single file name.
pub const MAX_KEY_LENGTH: usize = 255;

/// Request body for `PUT /entries/:key`
///
/// The key comes from the path; the body carries only the value, which may
/// be any JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct PutRequest {
    /// The value to cache
    pub value: Value,
}

/// Validates a cache key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
