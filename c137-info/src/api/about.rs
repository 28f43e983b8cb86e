//! About page content endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::about::{load_about, AboutContent};
use crate::AppState;

/// GET /api/about
pub async fn about(State(state): State<AppState>) -> Json<AboutContent> {
    let path = state.about_path.clone();
    let content = tokio::task::spawn_blocking(move || load_about(&path))
        .await
        .unwrap_or_else(|_| AboutContent::placeholder());
    Json(content)
}

/// Build about routes
pub fn about_routes() -> Router<AppState> {
    Router::new().route("/api/about", get(about))
}
