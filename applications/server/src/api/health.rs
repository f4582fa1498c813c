//! Health check API routes
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    pub size: usize,
    pub capacity: Option<usize>,
    pub hit_rate: f64,
    pub evictions: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: CacheHealth,
}

/// GET /api/health - Health check endpoint
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let stats = app_state.identity.cache().stats();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: CacheHealth {
            size: stats.size,
            capacity: stats.capacity,
            hit_rate: stats.hit_rate(),
            evictions: stats.evictions,
        },
    })
}
