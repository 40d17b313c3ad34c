//! # LabGate Domain
//!
//! Session and token types shared by every LabGate crate.
//!
//! This crate contains:
//! - Token, storage-scope and session-event types
//! - Request/response DTOs for the public auth endpoints
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Storage keys and endpoint paths
//!
//! ## Architecture
//! - No dependencies on other LabGate crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
