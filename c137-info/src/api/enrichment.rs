//! Character report endpoints
//!
//! `POST /api/character-info-stream` answers with Server-Sent Events: zero or
//! more `log` events, then exactly one `complete` or `error` event.
//! `POST /api/character-info` runs the same pipeline and answers once.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use c137_common::sse::enrichment_sse;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInfoRequest {
    pub character_name: String,
}

impl CharacterInfoRequest {
    fn validated_name(self) -> ApiResult<String> {
        if self.character_name.trim().is_empty() {
            return Err(ApiError::BadRequest("characterName is required".to_string()));
        }
        Ok(self.character_name)
    }
}

/// POST /api/character-info-stream
pub async fn character_info_stream(
    State(state): State<AppState>,
    Json(request): Json<CharacterInfoRequest>,
) -> ApiResult<Response> {
    let name = request.validated_name()?;
    info!(character = %name, "Starting streamed character report");

    let events = state.enrichment.clone().stream(name);
    Ok(enrichment_sse(events).into_response())
}

/// POST /api/character-info
pub async fn character_info(
    State(state): State<AppState>,
    Json(request): Json<CharacterInfoRequest>,
) -> ApiResult<Response> {
    let name = request.validated_name()?;
    info!(character = %name, "Starting character report");

    let response = match state.enrichment.report(&name).await {
        Ok(info) => Json(json!({ "info": info })).into_response(),
        Err(e) => {
            let status = if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    };
    Ok(response)
}

/// Build character report routes
pub fn enrichment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/character-info-stream", post(character_info_stream))
        .route("/api/character-info", post(character_info))
}
