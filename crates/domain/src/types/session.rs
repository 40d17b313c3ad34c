//! Session lifecycle events and refresh outcomes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a refresh cycle could not produce a new token pair.
///
/// Cloned to every request queued behind the refresh, so it carries only
/// owned strings.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum RefreshFailure {
    #[error("no refresh token available")]
    MissingRefreshToken,

    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("refresh request failed: {0}")]
    Network(String),

    #[error("refresh response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("failed to persist refreshed tokens: {0}")]
    Storage(String),

    #[error("refresh abandoned before it settled")]
    Abandoned,
}

/// Notifications published to the hosting application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Tokens were issued by a login and persisted.
    LoggedIn { remember: bool },
    /// A refresh committed a new token pair.
    TokensRotated,
    /// The session is gone; the host must navigate to `redirect_to` and drop
    /// any in-memory auth state.
    Invalidated { reason: String, redirect_to: String },
    /// Explicit logout.
    LoggedOut,
}
