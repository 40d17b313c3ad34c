//! # LabGate Core
//!
//! Session logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - The dual-scope [`TokenStore`]
//! - The single-flight [`RefreshCoordinator`]
//! - [`AuthSession`], which recovers from 401 responses
//! - Port traits implemented by `labgate-infra`
//!
//! ## Architecture Principles
//! - Only depends on `labgate-domain`
//! - No HTTP or filesystem code
//! - All external dependencies via traits

pub mod auth;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{
    AuthSession, KeyValueStore, PendingRefresh, RefreshCoordinator, RefreshLease, RefreshOutcome,
    RefreshTicket, SessionEvents, TokenRefresher, TokenStore,
};
