//! Login, logout and account flows on top of the public client

use std::sync::Arc;

use labgate_core::AuthSession;
use labgate_domain::{
    LoginRequest, PasswordResetConfirmation, PasswordResetRequest, RegisterRequest, SessionEvent,
};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{info, instrument};

use super::errors::ApiError;
use super::public::PublicClient;

/// Session entry and exit points.
#[derive(Clone)]
pub struct AuthService {
    public: PublicClient,
    session: Arc<AuthSession>,
}

impl AuthService {
    pub fn new(public: PublicClient, session: Arc<AuthSession>) -> Self {
        Self { public, session }
    }

    /// Log in and persist the issued tokens.
    ///
    /// With `remember` the tokens go to the durable scope and the email is
    /// kept as a login hint; without it they live in the session scope and
    /// any earlier hint is forgotten.
    ///
    /// # Errors
    /// The login call's error, or `ApiError::Storage` if persisting fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<(), ApiError> {
        let pair = self.public.login(&LoginRequest::new(email, password)).await?;

        let tokens = self.session.tokens();
        tokens.store_pair(&pair, remember)?;
        tokens.set_remember_flag(remember)?;
        tokens.set_remembered_email(remember.then_some(email))?;

        info!(remember, "logged in");
        self.session.events().emit(SessionEvent::LoggedIn { remember });
        Ok(())
    }

    /// Forget every piece of session state.
    ///
    /// # Errors
    /// `ApiError::Storage` if a backend could not be cleared.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.tokens().clear_all()?;
        info!("logged out");
        self.session.events().emit(SessionEvent::LoggedOut);
        Ok(())
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.public.register(request).await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        self.public.request_password_reset(&PasswordResetRequest { email: email.to_string() }).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let confirmation = PasswordResetConfirmation {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.public.reset_password(&confirmation).await
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.tokens().is_authenticated()
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.session.tokens().remembered_email()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }
}
