//! # LabGate Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP transport and the public/authenticated gateway clients
//! - File and in-memory token storage backends
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `labgate-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, ApiErrorCategory, ApiRequest, AuthService, PublicClient};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{FileStore, MemoryStore};
