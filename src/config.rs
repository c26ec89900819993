//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application-private root; entries live in its `file_storage` subdirectory
    pub cache_dir: PathBuf,
    /// Validity window in seconds applied to every entry
    pub ttl_secs: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Use SHA-256 file names instead of sanitized keys
    pub hashed_file_names: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Root directory for cached files (default: ./data)
    /// - `CACHE_TTL_SECS` - Entry TTL in seconds (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `HASHED_FILE_NAMES` - `true`/`1` to hash keys into file names (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_secs),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            hashed_file_names: env::var("HASHED_FILE_NAMES")
                .ok()
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(defaults.hashed_file_names),
        }
    }

    /// TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data"),
            ttl_secs: 86_400,
            server_port: 3000,
            hashed_file_names: false,
        }
    }
}
