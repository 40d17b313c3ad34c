//! Dual-scope token store
//!
//! Tokens live in exactly one of two backends: the durable scope when the
//! user asked to be remembered, the session scope otherwise. Reads prefer
//! the durable copy, then fall back to the session copy.

use std::sync::Arc;

use labgate_domain::constants::{REMEMBERED_EMAIL_KEY, REMEMBER_ME_KEY, SESSION_KEYS};
use labgate_domain::{Result, StorageScope, TokenKind, TokenPair};
use tracing::{debug, warn};

use super::ports::KeyValueStore;

/// Token persistence over a durable and a session-scoped backend.
#[derive(Clone)]
pub struct TokenStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Create a store over the two backends.
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    fn backend(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Session => self.session.as_ref(),
        }
    }

    /// Write a token into the scope selected by `remember`.
    ///
    /// The copy in the other scope is removed before the write, so a token
    /// never resolves from both scopes at once.
    ///
    /// # Errors
    /// Returns the backend error; on failure the token may be absent from
    /// both scopes but is never present in both.
    pub fn set_token(&self, kind: TokenKind, value: &str, remember: bool) -> Result<()> {
        let target = StorageScope::for_remember(remember);
        let key = kind.storage_key();

        self.backend(target.other()).remove(key)?;
        self.backend(target).set(key, value)?;

        debug!(token = %kind, scope = %target, "token stored");
        Ok(())
    }

    /// Read a token, durable copy first.
    ///
    /// Backend failures are logged and treated as absence: an anonymous
    /// caller is a valid state.
    pub fn get_token(&self, kind: TokenKind) -> Option<String> {
        self.read(StorageScope::Durable, kind.storage_key())
            .or_else(|| self.read(StorageScope::Session, kind.storage_key()))
    }

    /// Persist both tokens of a pair into the same scope.
    ///
    /// # Errors
    /// Returns the first backend error.
    pub fn store_pair(&self, pair: &TokenPair, remember: bool) -> Result<()> {
        for kind in TokenKind::ALL {
            self.set_token(kind, pair.get(kind), remember)?;
        }
        Ok(())
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.get_token(TokenKind::Access)
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.get_token(TokenKind::Refresh)
    }

    /// Whether an access token is available.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Scope currently holding `kind`, if any.
    pub fn scope_of(&self, kind: TokenKind) -> Option<StorageScope> {
        [StorageScope::Durable, StorageScope::Session]
            .into_iter()
            .find(|scope| self.read(*scope, kind.storage_key()).is_some())
    }

    /// Remove tokens, remember flag and remembered email from both scopes.
    ///
    /// Idempotent. Every key is attempted even if an earlier removal fails.
    ///
    /// # Errors
    /// Returns the first backend error encountered.
    pub fn clear_all(&self) -> Result<()> {
        let mut first_error = None;

        for scope in [StorageScope::Durable, StorageScope::Session] {
            for key in SESSION_KEYS {
                if let Err(err) = self.backend(scope).remove(key) {
                    warn!(key, scope = %scope, error = %err, "failed to clear session key");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                debug!("session storage cleared");
                Ok(())
            }
        }
    }

    /// Record the "remember me" preference (durable scope only).
    ///
    /// # Errors
    /// Returns the backend error.
    pub fn set_remember_flag(&self, remember: bool) -> Result<()> {
        self.durable.set(REMEMBER_ME_KEY, if remember { "true" } else { "false" })
    }

    /// The recorded "remember me" preference; `false` when never set.
    pub fn get_remember_flag(&self) -> bool {
        self.read(StorageScope::Durable, REMEMBER_ME_KEY).is_some_and(|value| value == "true")
    }

    /// Record or forget the identity hint shown on the login form.
    ///
    /// # Errors
    /// Returns the backend error.
    pub fn set_remembered_email(&self, email: Option<&str>) -> Result<()> {
        match email {
            Some(email) => self.durable.set(REMEMBERED_EMAIL_KEY, email),
            None => self.durable.remove(REMEMBERED_EMAIL_KEY),
        }
    }

    /// The remembered identity hint, if any.
    pub fn remembered_email(&self) -> Option<String> {
        self.read(StorageScope::Durable, REMEMBERED_EMAIL_KEY)
    }

    fn read(&self, scope: StorageScope, key: &str) -> Option<String> {
        match self.backend(scope).get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, scope = %scope, error = %err, "token storage read failed");
                None
            }
        }
    }
}
