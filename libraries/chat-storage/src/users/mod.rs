//! User persistence queries
//!
//! Timestamps are stored as Unix milliseconds.

use crate::error::{Result, StorageError};
use chat_core::types::{AccessToken, User, UserId};
use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, SqlitePool};

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    access_token TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    color REAL NOT NULL,
    created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000),
    disabled_at INTEGER
)
"#;

const SELECT_USER: &str =
    "SELECT id, access_token, display_name, color, created_at, disabled_at FROM users";

#[derive(FromRow)]
struct UserRecord {
    id: UserId,
    access_token: AccessToken,
    display_name: String,
    color: f64,
    created_at: i64,
    disabled_at: Option<i64>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> std::result::Result<Self, Self::Error> {
        let created_at = DateTime::from_timestamp_millis(record.created_at)
            .ok_or_else(|| format!("created_at out of range: {}", record.created_at))?;
        let disabled_at = match record.disabled_at {
            Some(ms) => Some(
                DateTime::from_timestamp_millis(ms)
                    .ok_or_else(|| format!("disabled_at out of range: {}", ms))?,
            ),
            None => None,
        };

        Ok(User {
            id: record.id,
            access_token: record.access_token,
            display_name: record.display_name,
            display_color: record.color,
            created_at,
            disabled_at,
        })
    }
}

/// Ensure the `users` table exists
///
/// A statement that fails to prepare is fatal. A prepared statement that
/// fails to execute is logged and ignored, since creation is idempotent.
pub async fn create_table(pool: &SqlitePool) -> Result<()> {
    tracing::trace!("Creating users table");

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| StorageError::Schema(e.to_string()))?;

    (&mut *conn)
        .prepare(CREATE_USERS_TABLE)
        .await
        .map_err(|e| StorageError::Schema(e.to_string()))?;

    if let Err(e) = sqlx::query(CREATE_USERS_TABLE).execute(&mut *conn).await {
        tracing::warn!("Creating users table failed: {}", e);
    }

    Ok(())
}

/// Persist a new user
///
/// The insert runs in its own transaction. If anything fails before
/// `commit`, the transaction is rolled back when dropped.
pub async fn insert(pool: &SqlitePool, user: &User) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, access_token, display_name, color, created_at, disabled_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.access_token)
    .bind(&user.display_name)
    .bind(user.display_color)
    .bind(user.created_at.timestamp_millis())
    .bind(user.disabled_at.map(|at| at.timestamp_millis()))
    .execute(&mut *tx)
    .await
    .map_err(StorageError::from_write)?;

    tx.commit().await?;

    Ok(())
}

/// Get a user by ID
///
/// Returns `None` if no row matches or the row cannot be decoded.
pub async fn find_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let record = sqlx::query_as::<_, UserRecord>(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await;

    into_user(record)
}

/// Get a user by access token
///
/// Same not-found contract as [`find_by_id`].
pub async fn find_by_token(pool: &SqlitePool, token: &AccessToken) -> Result<Option<User>> {
    let record = sqlx::query_as::<_, UserRecord>(&format!("{SELECT_USER} WHERE access_token = ?"))
        .bind(token)
        .fetch_optional(pool)
        .await;

    into_user(record)
}

/// Soft-disable a user
///
/// Only rows that are still active are updated, so the first timestamp wins.
/// Returns the effective `disabled_at`, or `None` if the user does not exist.
pub async fn disable(pool: &SqlitePool, id: &UserId) -> Result<Option<DateTime<Utc>>> {
    let now = Utc::now().timestamp_millis();

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE users SET disabled_at = ? WHERE id = ? AND disabled_at IS NULL")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let disabled_at: Option<Option<i64>> =
        sqlx::query_scalar("SELECT disabled_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    tx.commit().await?;

    Ok(disabled_at
        .flatten()
        .and_then(DateTime::from_timestamp_millis))
}

/// Count all users, active and disabled
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// List users in creation order
///
/// Rows that cannot be decoded are skipped.
pub async fn list(pool: &SqlitePool, limit: u32, offset: u32) -> Result<Vec<User>> {
    let records = sqlx::query_as::<_, UserRecord>(&format!(
        "{SELECT_USER} ORDER BY created_at, id LIMIT ? OFFSET ?"
    ))
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(pool)
    .await?;

    let users = records
        .into_iter()
        .filter_map(|record| match User::try_from(record) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Skipping malformed user row: {}", e);
                None
            }
        })
        .collect();

    Ok(users)
}

/// Map a point-lookup result onto the not-found contract
///
/// Decoding failures count as "not found"; connection and query failures
/// are passed through.
fn into_user(record: std::result::Result<Option<UserRecord>, sqlx::Error>) -> Result<Option<User>> {
    match record {
        Ok(Some(record)) => match User::try_from(record) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!("Malformed user row: {}", e);
                Ok(None)
            }
        },
        Ok(None) => Ok(None),
        Err(
            e @ (sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)),
        ) => {
            tracing::warn!("Malformed user row: {}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
