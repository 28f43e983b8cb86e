//! Character endpoints
//!
//! Thin wrappers over [`CharacterClient`](crate::character::CharacterClient).
//! `/api/random-character` never fails: when the whole fallback chain is
//! exhausted it serves the built-in record.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::character::{
    placeholder_character, static_fallback_character, CharacterPage, CharacterRecord,
};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

/// GET /api/characters/count
pub async fn character_count(State(state): State<AppState>) -> ApiResult<Json<CountResponse>> {
    let count = state.characters.count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/characters/:id
pub async fn character_by_id(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<CharacterRecord>> {
    let record = state.characters.get_by_id(id).await?;
    Ok(Json(record))
}

/// GET /api/characters?page=n
pub async fn character_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CharacterPage>> {
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::BadRequest("page numbers start at 1".to_string()));
    }
    let result = state.characters.get_page(page).await?;
    Ok(Json(result))
}

/// GET /api/characters/search?name=q
pub async fn character_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<CharacterPage>> {
    let result = state.characters.search_by_name(&query.name).await?;
    Ok(Json(result))
}

/// GET /api/random-character
pub async fn random_character(State(state): State<AppState>) -> Json<CharacterRecord> {
    match state.characters.random().await {
        Ok(record) => Json(record.with_display_status()),
        Err(e) => {
            warn!(error = %e, "Failed to load random character, using fallback");
            Json(static_fallback_character())
        }
    }
}

/// GET /api/placeholder-character
pub async fn placeholder() -> Json<CharacterRecord> {
    Json(placeholder_character())
}

/// Build character routes
pub fn character_routes() -> Router<AppState> {
    Router::new()
        .route("/api/characters", get(character_page))
        .route("/api/characters/count", get(character_count))
        .route("/api/characters/search", get(character_search))
        .route("/api/characters/:id", get(character_by_id))
        .route("/api/random-character", get(random_character))
        .route("/api/placeholder-character", get(placeholder))
}
