//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use labgate_core::{AuthSession, KeyValueStore, SessionEvents, TokenStore};
use labgate_domain::{Config, Result, SessionEvent};
use labgate_infra::{
    ApiClient, AuthService, FileStore, HttpClientBuilder, MemoryStore, PublicClient,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub session: Arc<AuthSession>,
    pub api: ApiClient,
    pub auth: AuthService,
}

impl AppContext {
    /// Load configuration and wire every service.
    ///
    /// # Errors
    /// Returns the configuration or storage error that prevented startup.
    pub fn new() -> Result<Self> {
        let config = labgate_infra::config::load()?;
        Self::new_with_config(config)
    }

    /// Wire every service from an explicit configuration.
    ///
    /// The durable scope is a JSON file at `config.storage.durable_path`;
    /// the session scope lives in memory for the lifetime of the process.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the durable
    /// store cannot be opened.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let http = HttpClientBuilder::from_config(&config.api).build()?;

        let durable: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(&config.storage.durable_path)?);
        let session_scope: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let tokens = TokenStore::new(durable, session_scope);

        let public = PublicClient::new(http.clone(), config.api.base_url.clone());
        let session =
            Arc::new(AuthSession::new(tokens, Arc::new(public.clone()), SessionEvents::new()));
        let api = ApiClient::new(http, config.api.base_url.clone(), Arc::clone(&session))
            .with_timeout(Duration::from_secs(config.api.timeout_seconds));
        let auth = AuthService::new(public, Arc::clone(&session));

        info!(
            base_url = %config.api.base_url,
            storage = %config.storage.durable_path,
            "application context ready"
        );

        Ok(Self { config, session, api, auth })
    }

    /// Log session events as they happen.
    ///
    /// On invalidation the host is expected to send the user back to the
    /// login entry point; for the CLI that means asking them to log in again.
    pub fn spawn_event_listener(&self) -> JoinHandle<()> {
        let mut events = self.session.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Invalidated { reason, redirect_to }) => {
                        warn!(%reason, %redirect_to, "session invalidated, login required");
                    }
                    Ok(SessionEvent::LoggedIn { remember }) => info!(remember, "session started"),
                    Ok(SessionEvent::TokensRotated) => debug!("session tokens rotated"),
                    Ok(SessionEvent::LoggedOut) => info!("session ended"),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "session event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
