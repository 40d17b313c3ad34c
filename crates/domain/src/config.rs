//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_STORAGE_PATH, DEFAULT_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to (no trailing slash)
    pub base_url: String,
    /// Transport timeout per attempt
    pub timeout_seconds: u64,
    /// Total attempts for idempotent transport failures (5xx, connect errors)
    pub max_attempts: usize,
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: None,
        }
    }
}

/// Token persistence configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// File backing the durable ("remember me") scope
    pub durable_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { durable_path: DEFAULT_STORAGE_PATH.to_string() }
    }
}
