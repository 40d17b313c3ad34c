//! # LabGate API
//!
//! Host application layer - commands and main entry point.
//!
//! This crate contains:
//! - Commands (CLI → session and gateway bridge)
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Reacts to session events; the core never navigates itself

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
