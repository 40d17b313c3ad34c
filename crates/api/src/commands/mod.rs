//! Commands - CLI to session and gateway bridge

pub mod requests;
pub mod session;

pub use session::SessionStatus;
