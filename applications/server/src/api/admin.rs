//! Moderation API routes
use crate::{
    api::chat::UserResponse,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chat_core::UserId;
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
}

/// GET /api/admin/users
/// Page through registered chat users
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let users = app_state.store.list(limit, offset).await?;
    let total = app_state.store.count().await?;

    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
    }))
}

/// POST /api/admin/users/:id/disable
/// Soft-disable a chat user; the record is kept
pub async fn disable_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let id = UserId::new(id);
    let user = app_state
        .identity
        .resolve_by_id(&id)
        .await
        .ok_or_else(|| ServerError::NotFound(format!("User {}", id)))?;

    let disabled = app_state.identity.disable(&user).await?;
    tracing::info!(user_id = %disabled.id, "User disabled by moderator");

    Ok(Json(disabled.into()))
}
