//! Chat Storage
//!
//! `SQLite` persistence for chat identities.
//!
//! This crate owns the `users` table: schema creation, inserts, point
//! lookups by id and by access token, and soft-disable. It is the source of
//! truth behind the in-memory identity cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_storage::{create_pool, create_schema, SqliteUserStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://chat.db").await?;
//! create_schema(&pool).await?;
//!
//! let store = SqliteUserStore::new(pool);
//! let total = store.count().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

// Vertical slices
pub mod users;

pub use error::StorageError;
pub use store::SqliteUserStore;

use sqlx::sqlite::SqlitePool;

/// Ensure every table this crate needs exists
///
/// This should be called once when the application starts. Creation is
/// idempotent.
///
/// # Errors
///
/// Returns `StorageError::Schema` if a creation statement cannot be
/// prepared; the caller should treat this as fatal.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), StorageError> {
    users::create_table(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://chat.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Default pool size used by [`create_pool`]
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a new `SQLite` pool with an explicit connection limit
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool_with(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::debug!("Pool created");

    Ok(pool)
}
