//! Session recovery after an unauthorized response

use std::sync::Arc;

use labgate_domain::constants::LOGIN_ENTRY_POINT;
use labgate_domain::{RefreshFailure, SessionEvent};
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};

use super::events::SessionEvents;
use super::ports::TokenRefresher;
use super::refresh::{RefreshCoordinator, RefreshOutcome, RefreshTicket};
use super::token_store::TokenStore;

/// Authenticated session: token storage, the refresh coordinator and the
/// event channel, shared by every client of one process.
pub struct AuthSession {
    tokens: TokenStore,
    refresher: Arc<dyn TokenRefresher>,
    coordinator: RefreshCoordinator,
    events: SessionEvents,
}

impl AuthSession {
    pub fn new(
        tokens: TokenStore,
        refresher: Arc<dyn TokenRefresher>,
        events: SessionEvents,
    ) -> Self {
        Self { tokens, refresher, coordinator: RefreshCoordinator::new(), events }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Obtain a usable access token after a request carrying `failed_token`
    /// was rejected with 401.
    ///
    /// At most one refresh runs at a time. Requests arriving while it runs
    /// wait for it and share its outcome. On failure the session is torn
    /// down before the outcome is returned: storage is cleared, waiters are
    /// released with the same failure and [`SessionEvent::Invalidated`] is
    /// published.
    #[instrument(skip_all)]
    pub async fn recover_from_unauthorized(&self, failed_token: Option<&str>) -> RefreshOutcome {
        let ticket = self
            .coordinator
            .acquire_refresh_or_enqueue(failed_token, || self.tokens.access_token());

        let lease = match ticket {
            RefreshTicket::Rotated(token) => return Ok(token),
            RefreshTicket::Wait(pending) => return pending.wait().await,
            RefreshTicket::Lead(lease) => lease,
        };

        let outcome = self.rotate().await;
        match &outcome {
            Ok(_) => {
                lease.settle(&outcome);
                info!("access token refreshed");
                self.events.emit(SessionEvent::TokensRotated);
            }
            Err(failure) => {
                warn!(error = %failure, "token refresh failed, ending session");
                self.clear_storage();
                lease.settle(&outcome);
                self.emit_invalidated(failure.to_string());
            }
        }
        outcome
    }

    /// End the session without a refresh attempt.
    pub fn invalidate(&self, reason: impl Into<String>) {
        let reason = reason.into();
        info!(reason = %reason, "session invalidated");
        self.clear_storage();
        self.emit_invalidated(reason);
    }

    async fn rotate(&self) -> RefreshOutcome {
        let refresh_token = self.tokens.refresh_token().ok_or(RefreshFailure::MissingRefreshToken)?;
        let pair = self.refresher.refresh(&refresh_token).await?;

        // The preference chosen at login decides where rotated tokens live
        let remember = self.tokens.get_remember_flag();
        self.tokens
            .store_pair(&pair, remember)
            .map_err(|err| RefreshFailure::Storage(err.to_string()))?;

        Ok(pair.access_token)
    }

    fn clear_storage(&self) {
        if let Err(err) = self.tokens.clear_all() {
            error!(error = %err, "failed to clear session storage");
        }
    }

    fn emit_invalidated(&self, reason: String) {
        self.events.emit(SessionEvent::Invalidated {
            reason,
            redirect_to: LOGIN_ENTRY_POINT.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::join_all;
    use labgate_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use labgate_domain::TokenPair;

    use super::*;
    use crate::auth::ports::KeyValueStore;
    use crate::testing::{InMemoryKeyValueStore, ScriptedRefresher};

    struct Fixture {
        session: AuthSession,
        refresher: Arc<ScriptedRefresher>,
        durable: Arc<InMemoryKeyValueStore>,
        scoped: Arc<InMemoryKeyValueStore>,
    }

    fn fixture(refresher: ScriptedRefresher) -> Fixture {
        let durable = Arc::new(InMemoryKeyValueStore::new());
        let scoped = Arc::new(InMemoryKeyValueStore::new());
        let refresher = Arc::new(refresher);
        let tokens = TokenStore::new(durable.clone(), scoped.clone());
        let session = AuthSession::new(tokens, refresher.clone(), SessionEvents::new());
        Fixture { session, refresher, durable, scoped }
    }

    #[tokio::test]
    async fn test_concurrent_unauthorized_requests_share_one_refresh() {
        let f = fixture(
            ScriptedRefresher::succeeding(TokenPair::new("new-access", "new-refresh"))
                .with_delay(Duration::from_millis(50)),
        );
        f.session.tokens().store_pair(&TokenPair::new("old-access", "old-refresh"), false).unwrap();

        let outcomes = join_all(
            (0..8).map(|_| f.session.recover_from_unauthorized(Some("old-access"))),
        )
        .await;

        assert_eq!(f.refresher.calls(), 1);
        assert_eq!(f.refresher.seen_tokens(), vec!["old-refresh".to_string()]);
        for outcome in outcomes {
            assert_eq!(outcome, Ok("new-access".to_string()));
        }
        assert!(!f.session.coordinator().is_refreshing());
        assert_eq!(f.session.tokens().access_token().as_deref(), Some("new-access"));
    }

    #[tokio::test]
    async fn test_refresh_keeps_remembered_scope() {
        let f = fixture(ScriptedRefresher::succeeding(TokenPair::new("a2", "r2")));
        f.session.tokens().set_remember_flag(true).unwrap();
        f.session.tokens().store_pair(&TokenPair::new("a1", "r1"), true).unwrap();

        f.session.recover_from_unauthorized(Some("a1")).await.unwrap();

        assert_eq!(f.durable.value(ACCESS_TOKEN_KEY).as_deref(), Some("a2"));
        assert_eq!(f.durable.value(REFRESH_TOKEN_KEY).as_deref(), Some("r2"));
        assert_eq!(f.scoped.value(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_refresh_keeps_session_scope_when_not_remembered() {
        let f = fixture(ScriptedRefresher::succeeding(TokenPair::new("a2", "r2")));
        f.session.tokens().store_pair(&TokenPair::new("a1", "r1"), false).unwrap();

        f.session.recover_from_unauthorized(Some("a1")).await.unwrap();

        assert_eq!(f.scoped.value(ACCESS_TOKEN_KEY).as_deref(), Some("a2"));
        assert_eq!(f.durable.value(ACCESS_TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_tears_down_session() {
        let failure = RefreshFailure::Rejected { status: 401, message: "revoked".into() };
        let f = fixture(
            ScriptedRefresher::failing(failure.clone()).with_delay(Duration::from_millis(20)),
        );
        f.session.tokens().set_remember_flag(true).unwrap();
        f.session.tokens().store_pair(&TokenPair::new("a1", "r1"), true).unwrap();
        let mut events = f.session.subscribe();

        let outcomes =
            join_all((0..3).map(|_| f.session.recover_from_unauthorized(Some("a1")))).await;

        assert_eq!(f.refresher.calls(), 1);
        for outcome in outcomes {
            assert_eq!(outcome, Err(failure.clone()));
        }
        assert!(f.durable.is_empty());
        assert!(f.scoped.is_empty());
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::Invalidated {
                reason: failure.to_string(),
                redirect_to: "/login".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_network() {
        let f = fixture(ScriptedRefresher::succeeding(TokenPair::new("a", "r")));
        f.scoped.set(ACCESS_TOKEN_KEY, "a1").unwrap();

        let outcome = f.session.recover_from_unauthorized(Some("a1")).await;

        assert_eq!(outcome, Err(RefreshFailure::MissingRefreshToken));
        assert_eq!(f.refresher.calls(), 0);
        assert!(!f.session.tokens().is_authenticated());
    }

    #[tokio::test]
    async fn test_late_unauthorized_uses_rotated_token() {
        let f = fixture(ScriptedRefresher::succeeding(TokenPair::new("a2", "r2")));
        f.session.tokens().store_pair(&TokenPair::new("a1", "r1"), false).unwrap();

        f.session.recover_from_unauthorized(Some("a1")).await.unwrap();
        let late = f.session.recover_from_unauthorized(Some("a1")).await;

        assert_eq!(late, Ok("a2".to_string()));
        assert_eq!(f.refresher.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_clears_and_notifies() {
        let f = fixture(ScriptedRefresher::succeeding(TokenPair::new("a", "r")));
        f.session.tokens().store_pair(&TokenPair::new("a1", "r1"), true).unwrap();
        let mut events = f.session.subscribe();

        f.session.invalidate("account disabled");

        assert!(!f.session.tokens().is_authenticated());
        match events.recv().await.unwrap() {
            SessionEvent::Invalidated { reason, redirect_to } => {
                assert_eq!(reason, "account disabled");
                assert_eq!(redirect_to, LOGIN_ENTRY_POINT);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
