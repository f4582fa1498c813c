//! Chat identity API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, Json};
use chat_core::{AccessToken, User, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Credentials handed to a newly registered chat user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: UserId,
    pub access_token: AccessToken,
    pub display_name: String,
    pub display_color: f64,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            access_token: user.access_token,
            display_name: user.display_name,
            display_color: user.display_color,
        }
    }
}

/// Public view of a chat user; never carries the access token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub display_name: String,
    pub display_color: f64,
    pub created_at: DateTime<Utc>,
    pub disabled_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            display_color: user.display_color,
            created_at: user.created_at,
            disabled_at: user.disabled_at,
        }
    }
}

/// POST /api/chat/register
/// Create an anonymous chat user
pub async fn register(State(app_state): State<AppState>) -> Result<Json<RegisterResponse>> {
    let user = app_state.identity.register_anonymous_user().await?;
    Ok(Json(user.into()))
}

/// GET /api/chat/me
/// The caller identified by the bearer token
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserResponse> {
    Json(user.into())
}
