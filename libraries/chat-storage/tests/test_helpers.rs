//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so every pooled connection sees the same data, as in production.

#![allow(dead_code)]

use chat_core::types::{AccessToken, User, UserId};
use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with the schema applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = chat_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        chat_storage::create_schema(&pool)
            .await
            .expect("Failed to create schema");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: build an active user with millisecond-precision timestamps
pub fn test_user(id: &str, token: &str, display_name: &str, color: f64) -> User {
    User::new(
        UserId::new(id),
        AccessToken::new(token),
        display_name,
        color,
        Utc::now().trunc_subsecs(3),
    )
}
