//! c137-info library interface
//!
//! Exposes the character client, the enrichment pipeline and the HTTP
//! router for the binary and for integration tests.

pub mod about;
pub mod api;
pub mod character;
pub mod config;
pub mod enrichment;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::character::CharacterClient;
use crate::config::ServiceConfig;
use crate::enrichment::{
    CompletionClient, EnrichmentPipeline, HttpPageRenderer, HttpProbe, OpenAiClient, OFFLINE_DELAY,
};

/// Timeout for wiki requests outside the navigation budget (existence probe)
const WIKI_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Character REST API client
    pub characters: Arc<CharacterClient>,
    /// Wiki scrape + summarize pipeline
    pub enrichment: Arc<EnrichmentPipeline>,
    /// Completion client for generated error messages (None without API key)
    pub error_messages: Option<Arc<dyn CompletionClient>>,
    /// YAML file backing `/api/about`
    pub about_path: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        characters: Arc<CharacterClient>,
        enrichment: Arc<EnrichmentPipeline>,
        about_path: PathBuf,
    ) -> Self {
        Self {
            characters,
            enrichment,
            error_messages: None,
            about_path,
            startup_time: Utc::now(),
        }
    }

    pub fn with_error_messages(mut self, client: Option<Arc<dyn CompletionClient>>) -> Self {
        self.error_messages = client;
        self
    }

    /// Wire production collaborators from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> c137_common::Result<Self> {
        let characters = CharacterClient::http(&config.character_api_base_url, config.retry)
            .map_err(|e| c137_common::Error::Internal(format!("Character client: {}", e)))?;

        let wiki_client = reqwest::Client::builder()
            .user_agent(concat!("C137-INFO/", env!("CARGO_PKG_VERSION")))
            .timeout(WIKI_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| c137_common::Error::Internal(format!("Wiki client: {}", e)))?;

        let (report_client, error_client) = match &config.llm_api_key {
            Some(key) => {
                let report = OpenAiClient::new(&config.llm_endpoint, key, &config.llm_model)
                    .map_err(|e| c137_common::Error::Internal(format!("LLM client: {}", e)))?;
                let errors = report.with_model(&config.error_model);
                (
                    Some(Arc::new(report) as Arc<dyn CompletionClient>),
                    Some(Arc::new(errors) as Arc<dyn CompletionClient>),
                )
            }
            None => (None, None),
        };

        // The renderer enforces its own navigation timeouts
        let renderer_client = reqwest::Client::builder()
            .user_agent(concat!("C137-INFO/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| c137_common::Error::Internal(format!("Renderer client: {}", e)))?;

        let mut pipeline = EnrichmentPipeline::new(
            Arc::new(HttpProbe::new(wiki_client)),
            Arc::new(HttpPageRenderer::new(renderer_client)),
            config.wiki_base_url.clone(),
        )
        .with_completion(report_client)
        .with_prompt(config.prompt.clone());

        if config.dev_mode {
            pipeline = pipeline.offline(OFFLINE_DELAY);
        }

        Ok(Self::new(
            Arc::new(characters),
            Arc::new(pipeline),
            config.about_content_path.clone(),
        )
        .with_error_messages(error_client))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::character_routes())
        .merge(api::enrichment_routes())
        .merge(api::dynamic_error_routes())
        .merge(api::about_routes())
        .merge(api::extras_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
