//! Common test utilities for OmniHub integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use omnihub_core::UserId;
use omnihub_service::{bootstrap, create_router, AppState, ServiceConfig};
use omnihub_store::{RocksStore, Store};
use omnihub_tools::ToolsConfig;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct handle on the store, for seeding and assertions.
    pub store: Arc<RocksStore>,
    /// The configuration the service was built with.
    pub config: ServiceConfig,
    /// The bootstrap admin's account id.
    pub admin_id: UserId,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a harness with default tool endpoints (tests that never reach
    /// an adapter don't care where they point).
    pub fn new() -> Self {
        Self::with_tools(ToolsConfig::default())
    }

    /// Create a harness whose adapters point at the given endpoints,
    /// typically a wiremock server.
    pub fn with_tools(tools: ToolsConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: "test-secret".into(),
            admin_bootstrap_credits: 1000,
            tools,
            ..ServiceConfig::default()
        };

        bootstrap::ensure_admin(store.as_ref(), &config).expect("Failed to bootstrap admin");
        let admin_id = store
            .get_account_by_email(&config.admin_email)
            .expect("Failed to read admin")
            .expect("Bootstrap admin missing")
            .user_id;

        let state = AppState::new(Arc::clone(&store), config.clone());
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            config,
            admin_id,
            _temp_dir: temp_dir,
        }
    }

    /// Register a user through the API; returns (bearer token, user id).
    pub async fn register(&self, email: &str, password: &str) -> (String, UserId) {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "email": email,
                "name": "Test User",
                "password": password,
            }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        let token = body["access_token"].as_str().unwrap().to_string();
        let user_id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, user_id)
    }

    /// Log in through the API and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Log in as the bootstrap admin.
    pub async fn admin_token(&self) -> String {
        self.login(&self.config.admin_email, &self.config.admin_password)
            .await
    }

    /// Grant credits directly through the store, attributed to the
    /// bootstrap admin.
    pub fn grant(&self, user_id: &UserId, amount: i64) {
        self.store
            .adjust_credits(user_id, amount, "test grant", &self.admin_id)
            .expect("Failed to grant credits");
    }

    /// Bearer header value for a token.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
