//! Token storage, single-flight refresh and session lifecycle

pub mod events;
pub mod ports;
pub mod refresh;
pub mod session;
pub mod token_store;

pub use events::SessionEvents;
pub use ports::{KeyValueStore, TokenRefresher};
pub use refresh::{PendingRefresh, RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshTicket};
pub use session::AuthSession;
pub use token_store::TokenStore;
