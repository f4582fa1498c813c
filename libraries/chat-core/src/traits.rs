/// Core traits for the chat identity layer
use crate::error::Result;
use crate::types::{AccessToken, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable user bookkeeping
///
/// The store is the source of truth whenever the in-memory identity cache
/// misses. Implementations must reconstruct every field of a `User` on
/// lookup and must wrap writes in a transaction that either commits or rolls
/// back on every exit path.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a newly created user
    ///
    /// # Errors
    /// Returns `ChatError::Duplicate` if the id or access token is taken, or a
    /// storage error if the write could not be completed
    async fn insert(&self, user: &User) -> Result<()>;

    /// Look up a user by identifier
    ///
    /// A missing or malformed row yields `Ok(None)`; errors are reserved for
    /// an unreachable store.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Look up a user by access token
    ///
    /// Same not-found contract as [`UserStore::find_by_id`].
    async fn find_by_token(&self, token: &AccessToken) -> Result<Option<User>>;

    /// Soft-disable a user
    ///
    /// Returns the effective `disabled_at` timestamp, or `None` if no user
    /// with this id exists. Disabling an already disabled user keeps the
    /// original timestamp.
    async fn disable(&self, id: &UserId) -> Result<Option<DateTime<Utc>>>;
}
