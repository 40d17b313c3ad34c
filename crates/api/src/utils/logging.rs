use std::time::Duration;

use labgate_infra::{ApiError, ApiErrorCategory};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// The filter comes from `LABGATE_LOG`, then `RUST_LOG`, defaulting to
/// `info`. `LABGATE_LOG_FORMAT=json` switches to JSON lines. Calling this
/// twice is harmless.
pub fn init_logging() {
    let filter = std::env::var("LABGATE_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let json = std::env::var("LABGATE_LOG_FORMAT").is_ok_and(|format| format == "json");
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let _ = if json { builder.json().try_init() } else { builder.try_init() };
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    error: Option<&ApiError>,
) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            "command_execution_failure"
        ),
    }
}

/// Convert an `ApiError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ApiError) -> &'static str {
    if error.is_session_expired() {
        return "session_expired";
    }
    match error.category() {
        ApiErrorCategory::Authentication => "unauthorized",
        ApiErrorCategory::RateLimit => "rate_limit",
        ApiErrorCategory::Server => "server",
        ApiErrorCategory::Client => "client",
        ApiErrorCategory::Network => "network",
        ApiErrorCategory::Config => "config",
        ApiErrorCategory::Local => "local",
    }
}
