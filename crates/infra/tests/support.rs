//! Shared harness for gateway integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use labgate_core::{AuthSession, SessionEvents, TokenStore};
use labgate_domain::{ApiConfig, TokenPair};
use labgate_infra::{ApiClient, AuthService, FileStore, HttpClientBuilder, MemoryStore, PublicClient};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock gateway plus a fully wired client stack.
pub struct Harness {
    pub server: MockServer,
    pub api: ApiClient,
    pub auth: AuthService,
    pub session: Arc<AuthSession>,
    pub session_scope: Arc<MemoryStore>,
    pub durable_path: PathBuf,
    _temp_dir: TempDir,
}

impl Harness {
    pub async fn start() -> Self {
        let config = ApiConfig { max_attempts: 1, timeout_seconds: 5, ..ApiConfig::default() };
        Self::start_with_config(&config).await
    }

    /// Wire the stack with an HTTP client built from `config`. The base URL
    /// always points at the mock gateway.
    pub async fn start_with_config(config: &ApiConfig) -> Self {
        init_tracing();

        let server = MockServer::start().await;
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let durable_path = temp_dir.path().join("session.json");

        let durable = Arc::new(FileStore::open(&durable_path).expect("file store should open"));
        let session_scope = Arc::new(MemoryStore::new());
        let tokens = TokenStore::new(durable, session_scope.clone());

        let http = HttpClientBuilder::from_config(config).build().expect("http client should build");
        let public = PublicClient::new(http.clone(), server.uri());
        let session =
            Arc::new(AuthSession::new(tokens, Arc::new(public.clone()), SessionEvents::new()));
        let api = ApiClient::new(http, server.uri(), session.clone());
        let auth = AuthService::new(public, session.clone());

        Self { server, api, auth, session, session_scope, durable_path, _temp_dir: temp_dir }
    }

    /// Seed storage as if a login had already happened.
    pub fn seed_tokens(&self, access: &str, refresh: &str, remember: bool) {
        let tokens = self.session.tokens();
        tokens.set_remember_flag(remember).expect("remember flag should persist");
        tokens.store_pair(&TokenPair::new(access, refresh), remember).expect("tokens should persist");
    }

    /// Mount a refresh endpoint expecting `refresh_token` exactly once.
    pub async fn mount_refresh(
        &self,
        refresh_token: &str,
        response: ResponseTemplate,
    ) {
        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(json!({ "refreshToken": refresh_token })))
            .respond_with(response)
            .expect(1)
            .named("refresh")
            .mount(&self.server)
            .await;
    }

    /// Reopen the durable file to observe what actually reached disk.
    pub fn durable_on_disk(&self) -> FileStore {
        FileStore::open(&self.durable_path).expect("file store should reopen")
    }
}

/// Refresh success body.
pub fn token_body(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "accessToken": access,
        "refreshToken": refresh,
    }))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("labgate_core=debug,labgate_infra=debug")
        .with_test_writer()
        .try_init();
}
