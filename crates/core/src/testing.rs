//! Test doubles for the auth ports

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use labgate_domain::{LabGateError, RefreshFailure, Result, TokenPair};
use parking_lot::Mutex;

use crate::auth::ports::{KeyValueStore, TokenRefresher};

/// HashMap-backed [`KeyValueStore`] with injectable read failures.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }

    /// Make every subsequent `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LabGateError::Storage("simulated read failure".into()));
        }
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}

/// [`TokenRefresher`] returning a fixed outcome, optionally after a delay.
pub struct ScriptedRefresher {
    outcome: std::result::Result<TokenPair, RefreshFailure>,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedRefresher {
    pub fn succeeding(pair: TokenPair) -> Self {
        Self::with_outcome(Ok(pair))
    }

    pub fn failing(failure: RefreshFailure) -> Self {
        Self::with_outcome(Err(failure))
    }

    fn with_outcome(outcome: std::result::Result<TokenPair, RefreshFailure>) -> Self {
        Self { outcome, delay: Duration::ZERO, calls: AtomicUsize::new(0), seen: Mutex::default() }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented so far, in call order.
    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl TokenRefresher for ScriptedRefresher {
    async fn refresh(&self, refresh_token: &str) -> std::result::Result<TokenPair, RefreshFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(refresh_token.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
