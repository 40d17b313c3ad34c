//! Domain types and models

pub mod auth;
pub mod requests;
pub mod session;

pub use auth::{StorageScope, TokenKind, TokenPair};
pub use requests::{
    LoginRequest, PasswordResetConfirmation, PasswordResetRequest, RefreshRequest,
    RegisterRequest,
};
pub use session::{RefreshFailure, SessionEvent};
