//! Generated error-page messages

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::enrichment::ERROR_PAGE_SYSTEM_PROMPT;
use crate::AppState;

/// Served whenever a message cannot be generated
pub const FALLBACK_ERROR_MESSAGE: &str =
    "Error generating error message. The universe is experiencing technical difficulties.";

const DEFAULT_ERROR_PROMPT: &str = "Generate a random funny error message";

#[derive(Debug, Default, Deserialize)]
pub struct DynamicErrorRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DynamicErrorResponse {
    pub content: String,
}

/// POST /api/dynamic-errors
pub async fn dynamic_error(
    State(state): State<AppState>,
    Json(request): Json<DynamicErrorRequest>,
) -> Json<DynamicErrorResponse> {
    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ERROR_PROMPT.to_string());

    let Some(client) = state.error_messages.as_ref() else {
        warn!("Error message requested but no LLM API key is configured");
        return Json(DynamicErrorResponse {
            content: FALLBACK_ERROR_MESSAGE.to_string(),
        });
    };

    let content = match client.complete(ERROR_PAGE_SYSTEM_PROMPT, &prompt).await {
        Ok(content) if !content.trim().is_empty() => content,
        Ok(_) => FALLBACK_ERROR_MESSAGE.to_string(),
        Err(e) => {
            warn!(error = %e, "Error generating error message");
            FALLBACK_ERROR_MESSAGE.to_string()
        }
    };

    Json(DynamicErrorResponse { content })
}

/// Build error message routes
pub fn dynamic_error_routes() -> Router<AppState> {
    Router::new().route("/api/dynamic-errors", post(dynamic_error))
}
