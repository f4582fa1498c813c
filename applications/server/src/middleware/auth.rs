//! Bearer-token middleware
use crate::{error::ServerError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chat_core::{AccessToken, User};

/// Chat user resolved from the request's access token
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Compare without short-circuiting on the first differing byte
fn tokens_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Middleware that resolves the caller from the Authorization header
///
/// Unknown tokens are rejected with 401, disabled users with 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(request.headers())
        .map(AccessToken::new)
        .ok_or_else(|| ServerError::Auth("Missing bearer token".to_string()))?;

    let user = state
        .identity
        .resolve_by_token(&token)
        .await
        .ok_or_else(|| {
            tracing::warn!("Rejected unknown access token");
            ServerError::Auth("Invalid access token".to_string())
        })?;

    if user.is_disabled() {
        tracing::info!(user_id = %user.id, "Rejected disabled user");
        return Err(ServerError::Forbidden("User is disabled".to_string()));
    }

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Middleware that guards moderation endpoints with the configured admin token
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let expected = state
        .admin_token
        .as_deref()
        .ok_or_else(|| ServerError::NotFound("Admin API is disabled".to_string()))?;

    match bearer_token(request.headers()) {
        Some(token) if tokens_match(token, expected) => Ok(next.run(request).await),
        _ => {
            tracing::warn!("Rejected admin request with invalid credentials");
            Err(ServerError::Auth("Invalid admin token".to_string()))
        }
    }
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
