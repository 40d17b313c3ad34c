#![allow(dead_code)]

use labgate_domain::{ApiConfig, Config, StorageConfig};
use labgate_lib::AppContext;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Application context wired against a mock gateway.
pub struct TestContext {
    pub ctx: AppContext,
    pub server: MockServer,
    /// Keep temporary directory alive for the lifetime of the context.
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn storage_config(&self) -> Config {
        self.ctx.config.clone()
    }
}

pub fn test_config(server: &MockServer, temp_dir: &TempDir) -> Config {
    Config {
        api: ApiConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
            max_attempts: 1,
            user_agent: Some("labgate-tests".to_string()),
        },
        storage: StorageConfig {
            durable_path: temp_dir.path().join("session.json").to_string_lossy().to_string(),
        },
    }
}

/// Create a context whose gateway accepts any login with `a1`/`r1`.
pub async fn setup_test_context() -> TestContext {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "a1", "refreshToken": "r1" })),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().expect("failed to create temporary storage directory");
    let ctx = AppContext::new_with_config(test_config(&server, &temp_dir))
        .expect("context should initialise");

    TestContext { ctx, server, temp_dir }
}
