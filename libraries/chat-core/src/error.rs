/// Core error types for the chat identity layer
use thiserror::Error;

/// Result type alias using `ChatError`
pub type Result<T> = std::result::Result<T, ChatError>;

/// Core error type shared across storage and service boundaries
#[derive(Error, Debug)]
pub enum ChatError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A unique key (id or access token) is already taken
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl ChatError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a duplicate entry error
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Whether retrying with freshly generated keys could succeed
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ChatError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
