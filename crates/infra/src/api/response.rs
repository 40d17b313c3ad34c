//! Response decoding shared by the public and authenticated clients

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::ApiError;

/// Decode a JSON body, classifying non-success statuses.
///
/// An empty body (204, 205, or a bare 200) decodes as `null`, so callers
/// expecting `()`, `Option<T>` or `Value` succeed.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    url: &str,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, url, &body));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

    if bytes.is_empty() {
        return serde_json::from_value(Value::Null).map_err(|_| {
            ApiError::Serialization(format!(
                "Empty response ({}), but response type cannot be deserialized from empty body",
                status.as_u16()
            ))
        });
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Serialization(format!("Failed to parse response: {}", e)))
}
