//! Common test utilities and fixtures

#![allow(dead_code)]

use axum::{body::Body, http::Response, Router};
use chat_identity::{IdentityCache, IdentityService, RandomIdentityGenerator};
use chat_server::{create_router, AppState};
use chat_storage::SqliteUserStore;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Router over a file-backed SQLite database that is removed on drop
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

impl TestApp {
    /// App with the admin API enabled
    pub async fn new() -> Self {
        Self::build(Some(ADMIN_TOKEN)).await
    }

    /// App without an admin token
    pub async fn without_admin() -> Self {
        Self::build(None).await
    }

    async fn build(admin_token: Option<&str>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = chat_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        chat_storage::create_schema(&pool)
            .await
            .expect("Failed to create schema");

        let store = Arc::new(SqliteUserStore::new(pool));
        let identity = Arc::new(IdentityService::new(
            Arc::new(IdentityCache::new(100)),
            Arc::clone(&store) as Arc<dyn chat_core::UserStore>,
            Arc::new(RandomIdentityGenerator::new()),
        ));

        let mut state = AppState::new(identity, store);
        if let Some(token) = admin_token {
            state = state.with_admin_token(token);
        }

        Self {
            router: create_router(state.clone()),
            state,
            _temp_dir: temp_dir,
        }
    }
}

/// Collect a response body as JSON
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
