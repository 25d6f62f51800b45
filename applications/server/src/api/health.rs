/// Health check API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub favorites: i64,
}

/// GET /api/health - Health check endpoint
///
/// Touches the store so a broken database shows up as a 500.
pub async fn health(State(app_state): State<AppState>) -> Result<Json<HealthResponse>> {
    let favorites = app_state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        favorites,
    }))
}
