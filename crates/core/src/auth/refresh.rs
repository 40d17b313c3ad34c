//! Single-flight refresh coordinator
//!
//! Two states: idle and refreshing. The first request that sees a 401 while
//! idle receives a [`RefreshLease`] and drives the refresh; every other 401
//! observed before the lease settles is queued and resolved, in arrival
//! order, with the lease's outcome.
//!
//! The lock is never held across an `.await`. Settling swaps the queue out
//! under the lock and resolves the waiters after releasing it.

use std::collections::VecDeque;

use labgate_domain::RefreshFailure;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// New access token on success, the shared failure otherwise.
pub type RefreshOutcome = Result<String, RefreshFailure>;

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    pending: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Owner of the refresh-in-flight flag and the pending request queue.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// What a request that just received a 401 should do next.
pub enum RefreshTicket<'a> {
    /// No refresh was running: the caller must refresh and settle the lease.
    Lead(RefreshLease<'a>),
    /// A refresh is running: wait for its outcome.
    Wait(PendingRefresh),
    /// The token that produced the 401 has already been replaced; replay
    /// with this one.
    Rotated(String),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh or join the one in flight.
    ///
    /// `failed_token` is the access token the rejected request carried.
    /// `current_token` is evaluated under the coordinator lock; if it yields
    /// a different token, a refresh has already committed since the request
    /// was sent and no new refresh is started.
    pub fn acquire_refresh_or_enqueue<F>(
        &self,
        failed_token: Option<&str>,
        current_token: F,
    ) -> RefreshTicket<'_>
    where
        F: FnOnce() -> Option<String>,
    {
        let mut state = self.state.lock();

        if state.refreshing {
            let (sender, receiver) = oneshot::channel();
            state.pending.push_back(sender);
            debug!(queued = state.pending.len(), "refresh in flight, request queued");
            return RefreshTicket::Wait(PendingRefresh { receiver });
        }

        if let Some(current) = current_token() {
            if failed_token != Some(current.as_str()) {
                debug!("access token already rotated, replaying without refresh");
                return RefreshTicket::Rotated(current);
            }
        }

        state.refreshing = true;
        debug!("refresh started");
        RefreshTicket::Lead(RefreshLease { coordinator: self, settled: false })
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of requests waiting on the current refresh.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    fn settle(&self, outcome: &RefreshOutcome) {
        let pending = {
            let mut state = self.state.lock();
            state.refreshing = false;
            std::mem::take(&mut state.pending)
        };

        let waiters = pending.len();
        for waiter in pending {
            // A waiter whose future was dropped has nothing left to resolve.
            let _ = waiter.send(outcome.clone());
        }

        debug!(waiters, success = outcome.is_ok(), "refresh settled");
    }
}

/// Exclusive right to run the current refresh.
///
/// Dropping a lease without settling it releases every waiter with
/// [`RefreshFailure::Abandoned`] and returns the coordinator to idle.
#[must_use = "an unsettled lease abandons the refresh"]
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Resolve every queued request with `outcome` and return to idle.
    pub fn settle(mut self, outcome: &RefreshOutcome) {
        self.settled = true;
        self.coordinator.settle(outcome);
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("refresh lease dropped before settling");
            self.coordinator.settle(&Err(RefreshFailure::Abandoned));
        }
    }
}

/// A queued request waiting for the refresh in flight.
pub struct PendingRefresh {
    receiver: oneshot::Receiver<RefreshOutcome>,
}

impl PendingRefresh {
    /// Wait for the refresh to settle.
    pub async fn wait(self) -> RefreshOutcome {
        self.receiver.await.unwrap_or(Err(RefreshFailure::Abandoned))
    }
}
