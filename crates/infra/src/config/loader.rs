//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `LABGATE_API_BASE_URL` is absent, falls back to loading from file
//! 3. If no file exists either, uses built-in defaults
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LABGATE_API_BASE_URL`: Gateway base URL (required for env loading)
//! - `LABGATE_API_TIMEOUT_SECS`: Per-dispatch deadline in seconds
//! - `LABGATE_API_MAX_ATTEMPTS`: Transport attempts for 5xx/connect failures
//! - `LABGATE_API_USER_AGENT`: User-Agent header
//! - `LABGATE_STORAGE_PATH`: File backing the durable token scope
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./labgate.json` or `./labgate.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use labgate_domain::{ApiConfig, Config, LabGateError, Result, StorageConfig};
use url::Url;

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `LabGateError::Config` if a source is present but invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::info!("No configuration found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `LABGATE_API_BASE_URL` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `LabGateError::Config` if the base URL is missing or any value
/// is invalid.
pub fn load_from_env() -> Result<Config> {
    let defaults = ApiConfig::default();

    let base_url = env_var("LABGATE_API_BASE_URL")?;
    let timeout_seconds = env_parse("LABGATE_API_TIMEOUT_SECS", defaults.timeout_seconds)?;
    let max_attempts = env_parse("LABGATE_API_MAX_ATTEMPTS", defaults.max_attempts)?;
    let user_agent = std::env::var("LABGATE_API_USER_AGENT").ok();
    let durable_path = std::env::var("LABGATE_STORAGE_PATH")
        .unwrap_or_else(|_| StorageConfig::default().durable_path);

    let config = Config {
        api: ApiConfig { base_url, timeout_seconds, max_attempts, user_agent },
        storage: StorageConfig { durable_path },
    };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LabGateError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LabGateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LabGateError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LabGateError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LabGateError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LabGateError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(LabGateError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        LabGateError::Config(format!("Invalid API base URL {}: {}", config.api.base_url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LabGateError::Config(format!(
            "API base URL must be http or https, got {}",
            url.scheme()
        )));
    }
    if config.api.timeout_seconds == 0 {
        return Err(LabGateError::Config("API timeout must be at least one second".into()));
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("labgate.json"),
        dir.join("labgate.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `LabGateError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        LabGateError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| LabGateError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
