//! Identity service errors

use crate::generator::GenerationError;
use chat_core::UserId;
use thiserror::Error;

/// Result type alias using `IdentityError`
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Errors surfaced to callers of the identity service
///
/// Raw store errors never cross this boundary; they are folded into
/// `PersistenceUnavailable`.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The generator could not produce a value; nothing was persisted
    #[error("Unable to create identity: {0}")]
    Generation(#[from] GenerationError),

    /// The store could not complete a write
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// The user to operate on does not exist in the store
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),
}

impl From<chat_core::ChatError> for IdentityError {
    fn from(err: chat_core::ChatError) -> Self {
        Self::PersistenceUnavailable(err.to_string())
    }
}
