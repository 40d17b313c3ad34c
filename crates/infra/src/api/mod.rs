//! Gateway clients for LabGate
//!
//! Two clients share one HTTP transport:
//!
//! - [`PublicClient`] calls the auth endpoints and carries no token.
//! - [`ApiClient`] calls everything else, attaches the bearer token and
//!   recovers from 401 through the single-flight refresh cycle.
//!
//! Entity modules built on [`ApiClient`] get self-healing authentication
//! for free and must not retry on 401 themselves.

pub mod auth;
pub mod client;
pub mod errors;
pub mod interceptor;
pub mod public;
pub mod request;
mod response;

pub use auth::AuthService;
pub use client::ApiClient;
pub use errors::{ApiError, ApiErrorCategory};
pub use interceptor::BearerInterceptor;
pub use public::PublicClient;
pub use request::ApiRequest;
