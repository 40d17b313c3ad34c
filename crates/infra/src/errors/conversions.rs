//! Conversions from external infrastructure errors into domain errors.

use labgate_domain::LabGateError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LabGateError);

impl From<InfraError> for LabGateError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LabGateError> for InfraError {
    fn from(value: LabGateError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLabGateError {
    fn into_labgate(self) -> LabGateError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LabGateError */
/* -------------------------------------------------------------------------- */

impl IntoLabGateError for HttpError {
    fn into_labgate(self) -> LabGateError {
        if self.is_timeout() {
            return LabGateError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LabGateError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return LabGateError::Serialization(format!("HTTP body could not be decoded: {self}"));
        }

        if self.is_builder() {
            return LabGateError::InvalidInput(format!("HTTP request is malformed: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => LabGateError::Auth(message),
                400..=499 => LabGateError::InvalidInput(message),
                _ => LabGateError::Network(message),
            };
        }

        LabGateError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_labgate())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → LabGateError */
/* -------------------------------------------------------------------------- */

impl IntoLabGateError for IoError {
    fn into_labgate(self) -> LabGateError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::PermissionDenied => {
                LabGateError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::NotFound => LabGateError::Storage(format!("file not found: {self}")),
            _ => LabGateError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_labgate())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → LabGateError */
/* -------------------------------------------------------------------------- */

impl IntoLabGateError for JsonError {
    fn into_labgate(self) -> LabGateError {
        LabGateError::Serialization(format!(
            "invalid JSON at line {} column {}: {}",
            self.line(),
            self.column(),
            self
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_labgate())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn io_permission_denied_maps_to_storage_error() {
        let err = IoError::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let mapped: LabGateError = InfraError::from(err).into();
        match mapped {
            LabGateError::Storage(msg) => assert!(msg.contains("permission denied")),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn json_error_maps_to_serialization_error() {
        let err = serde_json::from_str::<serde_json::Value>("{ broken").unwrap_err();
        let mapped: LabGateError = InfraError::from(err).into();
        assert!(matches!(mapped, LabGateError::Serialization(msg) if msg.contains("line 1")));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: LabGateError = InfraError::from(error).into();
        match mapped {
            LabGateError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }
}
