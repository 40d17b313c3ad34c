//! Public (token-free) client
//!
//! The only client allowed to call the auth endpoints. It never attaches a
//! bearer header and never takes part in the refresh cycle, so refreshing
//! can never recurse into itself.

use async_trait::async_trait;
use labgate_core::TokenRefresher;
use labgate_domain::constants::{
    FORGOT_PASSWORD_PATH, LOGIN_PATH, REFRESH_PATH, REGISTER_PATH, RESET_PASSWORD_PATH,
};
use labgate_domain::{
    LoginRequest, PasswordResetConfirmation, PasswordResetRequest, RefreshFailure, RefreshRequest,
    RegisterRequest, TokenPair,
};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use super::request::resolve_url;
use super::response::decode_json;
use crate::http::HttpClient;

/// Client for login, registration, refresh and password reset.
#[derive(Clone)]
pub struct PublicClient {
    http: HttpClient,
    base_url: String,
}

impl PublicClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    /// Exchange credentials for a token pair.
    ///
    /// # Errors
    /// `ApiError::Unauthorized` for rejected credentials, otherwise the
    /// classified transport or status error.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        let pair = self.post_json(LOGIN_PATH, request).await?;
        info!("login accepted");
        Ok(pair)
    }

    /// Create an account. The response body is returned as-is.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.post_json(REGISTER_PATH, request).await
    }

    /// Ask for a password reset link.
    #[instrument(skip_all)]
    pub async fn request_password_reset(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<(), ApiError> {
        let _: Value = self.post_json(FORGOT_PASSWORD_PATH, request).await?;
        Ok(())
    }

    /// Complete a password reset with the emailed token.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        confirmation: &PasswordResetConfirmation,
    ) -> Result<(), ApiError> {
        let _: Value = self.post_json(RESET_PASSWORD_PATH, confirmation).await?;
        Ok(())
    }

    async fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(Response, String), ApiError> {
        let url = resolve_url(&self.base_url, path)?;
        let url_text = url.to_string();
        debug!(url = %url_text, "public POST request");

        let response = self.http.send_once(self.http.request(Method::POST, url).json(body)).await?;
        Ok((response, url_text))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (response, url) = self.post_raw(path, body).await?;
        decode_json(response, &url).await
    }
}

#[async_trait]
impl TokenRefresher for PublicClient {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, RefreshFailure> {
        let body = RefreshRequest { refresh_token: refresh_token.to_string() };
        let (response, url) = self
            .post_raw(REFRESH_PATH, &body)
            .await
            .map_err(|err| RefreshFailure::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "refresh rejected");
            return Err(RefreshFailure::Rejected { status: status.as_u16(), message });
        }

        response.json().await.map_err(|err| RefreshFailure::InvalidResponse(err.to_string()))
    }
}
