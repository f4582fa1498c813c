//! Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chat_identity::IdentityError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Identity generation failed: {0}")]
    Generation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] chat_storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<IdentityError> for ServerError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Generation(e) => ServerError::Generation(e.to_string()),
            IdentityError::PersistenceUnavailable(msg) => ServerError::Unavailable(msg),
            IdentityError::UnknownUser(id) => ServerError::NotFound(format!("User {}", id)),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::Generation(ref msg) => {
                tracing::error!("Identity generation error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unable to create chat identity".to_string(),
                )
            }
            ServerError::Unavailable(ref msg) => {
                tracing::error!("Persistence unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Persistence unavailable".to_string(),
                )
            }
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::UserId;
    use chat_identity::GenerationError;

    #[test]
    fn identity_errors_map_to_status_codes() {
        let cases = [
            (
                IdentityError::Generation(GenerationError::new("no entropy")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                IdentityError::PersistenceUnavailable("locked".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                IdentityError::UnknownUser(UserId::new("ghost")),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (err, status) in cases {
            let response = ServerError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn auth_errors_are_client_errors() {
        assert_eq!(
            ServerError::Auth("missing".to_string()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::Forbidden("disabled".to_string())
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
    }
}
