//! Port interfaces for session persistence and token rotation
//!
//! These traits define the boundaries between the session logic and the
//! infrastructure that stores tokens and talks to the refresh endpoint.

use async_trait::async_trait;
use labgate_domain::{RefreshFailure, Result, TokenPair};

/// String key/value backend for one storage scope.
///
/// Implementations are synchronous: the refresh coordinator reads the current
/// access token while holding its lock, so a read must never suspend.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Exchanges a refresh token for a new token pair.
///
/// Implemented by the public (token-free) client so that refreshing never
/// depends on a valid access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Call the refresh endpoint once.
    ///
    /// # Errors
    /// Returns the failure that every request queued behind this refresh
    /// will observe.
    async fn refresh(&self, refresh_token: &str) -> std::result::Result<TokenPair, RefreshFailure>;
}
