//! Authenticated API client
//!
//! Every request goes through the bearer interceptor. A 401 hands control
//! to the shared [`AuthSession`], which refreshes at most once for any
//! number of concurrent failures, after which the request is replayed once
//! with the new token. Callers never see the first 401.

use std::sync::Arc;
use std::time::Duration;

use labgate_core::AuthSession;
use labgate_domain::constants::DEFAULT_TIMEOUT_SECS;
use reqwest::header::HeaderValue;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::errors::ApiError;
use super::interceptor::{with_bearer, BearerInterceptor};
use super::request::{resolve_url, ApiRequest};
use super::response::decode_json;
use crate::http::HttpClient;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Which dispatch of a request this is. A request is replayed at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Replay,
}

/// Client for every non-auth endpoint.
///
/// Cheap to clone; clones share the session and therefore the refresh
/// coordinator.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
    session: Arc<AuthSession>,
    interceptor: BearerInterceptor,
}

impl ApiClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>, session: Arc<AuthSession>) -> Self {
        let interceptor = BearerInterceptor::new(session.tokens().clone());
        Self {
            http,
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session,
            interceptor,
        }
    }

    /// Deadline for one dispatch, transport retries included.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Send `request`, recovering from one 401 through the refresh cycle.
    ///
    /// Any status other than 401 is returned untouched, errors included.
    ///
    /// # Errors
    /// - `ApiError::SessionExpired` if the refresh failed; the session has
    ///   been cleared
    /// - `ApiError::Unauthorized` if the replay was rejected again
    /// - transport errors (`Network`, `Timeout`)
    #[instrument(skip_all, fields(method = %request.method(), path = %request.path()))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let request_id = Uuid::new_v4();

        let (response, sent_token) =
            self.dispatch(request, request_id, Attempt::Initial, None).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(%request_id, "unauthorized, recovering session");
        let token = self
            .session
            .recover_from_unauthorized(sent_token.as_deref())
            .await
            .map_err(ApiError::SessionExpired)?;

        let (response, _) =
            self.dispatch(request, request_id, Attempt::Replay, Some(token)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(%request_id, "replay rejected after refresh");
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(StatusCode::UNAUTHORIZED, &url, &body));
        }

        Ok(response)
    }

    /// Execute and decode a JSON body.
    ///
    /// # Errors
    /// Everything [`ApiClient::execute`] returns, plus status and decode
    /// errors.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let url = response.url().to_string();
        let result = decode_json(response, &url).await?;
        info!(method = %request.method(), path = %request.path(), "request successful");
        Ok(result)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(&ApiRequest::get(path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(&ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(&ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute_json(&ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_json(&ApiRequest::delete(path)).await
    }

    /// Build and send one dispatch. On replay the refreshed token is
    /// attached directly instead of re-reading storage.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        request_id: Uuid,
        attempt: Attempt,
        token: Option<String>,
    ) -> Result<(Response, Option<String>), ApiError> {
        let url = resolve_url(&self.base_url, request.path())?;
        debug!(%request_id, ?attempt, url = %url, "dispatching request");

        let mut builder = self.http.request(request.method().clone(), url);
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }

        let (builder, sent_token) = match token {
            Some(token) => (with_bearer(builder, &token), Some(token)),
            None => self.interceptor.apply(builder),
        };

        let response = tokio::time::timeout(self.timeout, self.http.send(builder))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        Ok((response, sent_token))
    }
}
