//! Small generator endpoints

use axum::{extract::Query, routing::get, Json, Router};
use c137_common::words::{
    first_name, random_combination, weird_word, AdjectiveType, NounType, DEFAULT_IDENTITY,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct WeirdWordResponse {
    pub word: String,
}

#[derive(Debug, Deserialize)]
pub struct CombinationQuery {
    pub adjective: Option<AdjectiveType>,
    pub noun: Option<NounType>,
}

#[derive(Debug, Serialize)]
pub struct CombinationResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub name: String,
    pub first_name: String,
}

/// GET /api/weird-word
pub async fn weird_word_handler() -> Json<WeirdWordResponse> {
    let word = weird_word(&mut rand::thread_rng());
    Json(WeirdWordResponse { word })
}

/// GET /api/random-name?adjective=celestial&noun=star
pub async fn random_name(Query(query): Query<CombinationQuery>) -> Json<CombinationResponse> {
    let name = random_combination(
        &mut rand::thread_rng(),
        query.adjective.unwrap_or(AdjectiveType::Humorous),
        query.noun.unwrap_or(NounType::Animal),
    );
    Json(CombinationResponse { name })
}

/// GET /api/identity
pub async fn identity() -> Json<IdentityResponse> {
    Json(IdentityResponse {
        name: DEFAULT_IDENTITY.to_string(),
        first_name: first_name(DEFAULT_IDENTITY).to_string(),
    })
}

/// Build generator routes
pub fn extras_routes() -> Router<AppState> {
    Router::new()
        .route("/api/weird-word", get(weird_word_handler))
        .route("/api/random-name", get(random_name))
        .route("/api/identity", get(identity))
}
