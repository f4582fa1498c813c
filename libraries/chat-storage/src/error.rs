/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Schema could not be prepared; the process cannot serve identities
    #[error("Schema error: {0}")]
    Schema(String),

    /// A primary key or unique constraint rejected the write
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Classify a failed write, separating constraint violations from
    /// everything else
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Duplicate(db.message().to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl From<StorageError> for chat_core::ChatError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate(msg) => chat_core::ChatError::duplicate(msg),
            other => chat_core::ChatError::storage(other.to_string()),
        }
    }
}
