use crate::{users, StorageError};
use async_trait::async_trait;
use chat_core::{error::Result, traits::UserStore, types::*};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// `UserStore` backed by a local `SQLite` pool
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Total number of persisted users
    pub async fn count(&self) -> std::result::Result<i64, StorageError> {
        users::count(&self.pool).await
    }

    /// Page through persisted users in creation order
    pub async fn list(
        &self,
        limit: u32,
        offset: u32,
    ) -> std::result::Result<Vec<User>, StorageError> {
        users::list(&self.pool, limit, offset).await
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        Ok(users::insert(&self.pool, user).await?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        Ok(users::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_token(&self, token: &AccessToken) -> Result<Option<User>> {
        Ok(users::find_by_token(&self.pool, token).await?)
    }

    async fn disable(&self, id: &UserId) -> Result<Option<DateTime<Utc>>> {
        Ok(users::disable(&self.pool, id).await?)
    }
}
