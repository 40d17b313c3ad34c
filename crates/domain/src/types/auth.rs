//! Token and storage-scope types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::impl_label_conversions;

/// The two credentials a session carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Both kinds, in the order they are written.
    pub const ALL: [Self; 2] = [Self::Access, Self::Refresh];

    /// Key under which the token is persisted.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Access => ACCESS_TOKEN_KEY,
            Self::Refresh => REFRESH_TOKEN_KEY,
        }
    }
}

impl_label_conversions!(TokenKind {
    Access => "access",
    Refresh => "refresh",
});

/// Backing store lifetime.
///
/// `Durable` survives a restart, `Session` is dropped when the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    Durable,
    Session,
}

impl StorageScope {
    /// Scope selected by the "remember me" preference.
    #[must_use]
    pub const fn for_remember(remember: bool) -> Self {
        if remember {
            Self::Durable
        } else {
            Self::Session
        }
    }

    /// The opposite scope, where a stale copy must not survive.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Durable => Self::Session,
            Self::Session => Self::Durable,
        }
    }
}

impl_label_conversions!(StorageScope {
    Durable => "durable",
    Session => "session",
});

/// Access/refresh pair as returned by the login and refresh endpoints.
///
/// Both tokens always rotate together.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
    }

    /// Token value for the given kind.
    #[must_use]
    pub fn get(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_token,
            TokenKind::Refresh => &self.refresh_token,
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}
