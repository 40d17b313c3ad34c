//! Session event fan-out
//!
//! The core never navigates anywhere itself. It publishes [`SessionEvent`]s
//! and the hosting application decides what a login redirect means.

use labgate_domain::constants::SESSION_EVENT_CAPACITY;
use labgate_domain::SessionEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Broadcast channel for session lifecycle events.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        Self::with_capacity(SESSION_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: SessionEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        debug!(subscribers = delivered, "session event published");
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let events = SessionEvents::new();
        let mut rx = events.subscribe();

        events.emit(SessionEvent::LoggedIn { remember: true });
        events.emit(SessionEvent::LoggedOut);

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedIn { remember: true });
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        SessionEvents::new().emit(SessionEvent::TokensRotated);
    }
}
