/// Favorites API routes
///
/// Request validation lives here; the store trusts what it is given.
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use favorites_core::{
    is_valid_rank, CreateFavorite, Favorite, FavoriteId, UpdateFavorite, MAX_RANK,
};
use serde::{Deserialize, Serialize};

const YEAR_RANGE: std::ops::RangeInclusive<i64> = 1000..=9999;

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub rank: Option<i64>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i64>,
    pub last_played: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct MaxRankResponse {
    #[serde(rename = "maxRank")]
    pub max_rank: i64,
}

fn validate_year(year: i64) -> Result<i32> {
    if YEAR_RANGE.contains(&year) {
        Ok(year as i32)
    } else {
        Err(ServerError::BadRequest(
            "year must be a 4-digit integer".to_string(),
        ))
    }
}

fn validate_rank(rank: i64) -> Result<i64> {
    if is_valid_rank(rank) {
        Ok(rank)
    } else {
        Err(ServerError::BadRequest(format!(
            "rank must be an integer between 1 and {MAX_RANK}"
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CreateFavoriteRequest {
    fn validate(self) -> Result<CreateFavorite> {
        let (Some(rank), Some(title), Some(artist), Some(year)) = (
            self.rank,
            non_blank(self.title),
            non_blank(self.artist),
            self.year,
        ) else {
            return Err(ServerError::BadRequest(
                "rank, title, artist, and year are required".to_string(),
            ));
        };

        Ok(CreateFavorite {
            rank: validate_rank(rank)?,
            title,
            artist,
            year: Some(validate_year(year)?),
            last_played: self.last_played,
        })
    }
}

fn validate_update(update: &UpdateFavorite) -> Result<()> {
    if let Some(year) = update.year.as_set() {
        validate_year(i64::from(*year))?;
    }
    if let Some(rank) = update.rank {
        validate_rank(rank)?;
    }
    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&update.title) || blank(&update.artist) {
        return Err(ServerError::BadRequest(
            "title and artist must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn favorite_id(path: std::result::Result<Path<FavoriteId>, PathRejection>) -> Result<FavoriteId> {
    let Path(id) = path.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    Ok(id)
}

/// GET /api/favorites
/// List all favorites by rank
pub async fn list_favorites(State(app_state): State<AppState>) -> Result<Json<Vec<Favorite>>> {
    let favorites = app_state.store.list_by_rank().await?;
    Ok(Json(favorites))
}

/// GET /api/favorites/recent
/// List favorites by last played, never-played last
pub async fn list_recent(State(app_state): State<AppState>) -> Result<Json<Vec<Favorite>>> {
    let favorites = app_state.store.list_by_recency().await?;
    Ok(Json(favorites))
}

/// GET /api/favorites/max-rank
pub async fn max_rank(State(app_state): State<AppState>) -> Result<Json<MaxRankResponse>> {
    let max_rank = app_state.store.get_max_rank().await?;
    Ok(Json(MaxRankResponse { max_rank }))
}

/// GET /api/favorites/:id
pub async fn get_favorite(
    State(app_state): State<AppState>,
    path: std::result::Result<Path<FavoriteId>, PathRejection>,
) -> Result<Json<Favorite>> {
    let id = favorite_id(path)?;
    let favorite = app_state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(ServerError::not_found)?;

    Ok(Json(favorite))
}

/// POST /api/favorites
/// Insert a favorite at the requested rank
pub async fn create_favorite(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<CreateFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Favorite>)> {
    let Json(req) = payload?;
    let create = req.validate()?;

    let favorite = app_state.store.insert(create).await?;
    tracing::info!(
        "Added favorite {} '{}' at rank {}",
        favorite.id,
        favorite.title,
        favorite.rank
    );

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// PUT /api/favorites/:id
/// Partial update; a changed rank moves the favorite
pub async fn update_favorite(
    State(app_state): State<AppState>,
    path: std::result::Result<Path<FavoriteId>, PathRejection>,
    payload: std::result::Result<Json<UpdateFavorite>, JsonRejection>,
) -> Result<Json<Favorite>> {
    let id = favorite_id(path)?;
    let Json(update) = payload?;
    validate_update(&update)?;

    let favorite = app_state
        .store
        .update(id, update)
        .await?
        .ok_or_else(ServerError::not_found)?;

    Ok(Json(favorite))
}

/// DELETE /api/favorites/:id
pub async fn delete_favorite(
    State(app_state): State<AppState>,
    path: std::result::Result<Path<FavoriteId>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    let id = favorite_id(path)?;

    if !app_state.store.delete(id).await? {
        return Err(ServerError::not_found());
    }

    tracing::info!("Deleted favorite {}", id);
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/favorites/:id/played
/// Mark a favorite as played today
pub async fn mark_played(
    State(app_state): State<AppState>,
    path: std::result::Result<Path<FavoriteId>, PathRejection>,
) -> Result<Json<Favorite>> {
    let id = favorite_id(path)?;
    let favorite = app_state
        .store
        .mark_played(id)
        .await?
        .ok_or_else(ServerError::not_found)?;

    Ok(Json(favorite))
}
