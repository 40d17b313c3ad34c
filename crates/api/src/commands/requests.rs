//! Authenticated gateway requests

use std::time::Instant;

use labgate_infra::{ApiError, ApiRequest};
use serde_json::Value;
use tracing::info;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// GET `path` through the self-healing client.
pub async fn get(ctx: &AppContext, path: &str) -> Result<Value, ApiError> {
    send(ctx, ApiRequest::get(path)).await
}

/// Send an arbitrary request through the self-healing client.
pub async fn send(ctx: &AppContext, request: ApiRequest) -> Result<Value, ApiError> {
    let command_name = "requests::send";
    let start = Instant::now();
    info!(command = command_name, method = %request.method(), path = request.path(), "Executing request");

    let result = ctx.api.execute_json(&request).await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result
}
