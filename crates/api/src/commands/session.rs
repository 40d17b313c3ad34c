//! Session commands: login, logout, status and account recovery

use std::time::Instant;

use labgate_domain::{RegisterRequest, StorageScope, TokenKind};
use labgate_infra::ApiError;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Snapshot of the local session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub remember: bool,
    /// Scope currently holding the refresh token
    pub scope: Option<StorageScope>,
    pub remembered_email: Option<String>,
}

/// Log in and report the resulting session state.
pub async fn login(
    ctx: &AppContext,
    email: &str,
    password: &str,
    remember: bool,
) -> Result<SessionStatus, ApiError> {
    let command_name = "session::login";
    let start = Instant::now();
    info!(command = command_name, remember, "Executing login");

    let result = ctx.auth.login(email, password, remember).await.map(|()| status(ctx));

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

/// Forget every piece of session state.
pub fn logout(ctx: &AppContext) -> Result<(), ApiError> {
    let command_name = "session::logout";
    let start = Instant::now();

    let result = ctx.auth.logout();

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

/// Current session state, read from storage only.
pub fn status(ctx: &AppContext) -> SessionStatus {
    let tokens = ctx.session.tokens();
    SessionStatus {
        authenticated: tokens.is_authenticated(),
        remember: tokens.get_remember_flag(),
        scope: tokens.scope_of(TokenKind::Refresh),
        remembered_email: tokens.remembered_email(),
    }
}

pub async fn register(
    ctx: &AppContext,
    email: &str,
    password: &str,
    name: &str,
) -> Result<Value, ApiError> {
    let command_name = "session::register";
    let start = Instant::now();

    let request = RegisterRequest {
        email: email.to_string(),
        password: password.to_string(),
        name: name.to_string(),
    };
    let result = ctx.auth.register(&request).await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

pub async fn forgot_password(ctx: &AppContext, email: &str) -> Result<(), ApiError> {
    let command_name = "session::forgot_password";
    let start = Instant::now();

    let result = ctx.auth.request_password_reset(email).await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}

pub async fn reset_password(
    ctx: &AppContext,
    token: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let command_name = "session::reset_password";
    let start = Instant::now();

    let result = ctx.auth.reset_password(token, new_password).await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}
