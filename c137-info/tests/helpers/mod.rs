//! Test doubles and app-state builders shared by the HTTP tests

#![allow(dead_code)]

use async_trait::async_trait;
use c137_info::character::{
    CharacterClient, CharacterTransport, FetchError, RandomIdSource, RetryPolicy, UpstreamResponse,
};
use c137_info::enrichment::{
    BrowserError, BrowserSession, CompletionClient, CompletionError, EnrichmentPipeline,
    EntityProbe, NavigationError, PageRenderer, WaitUntil,
};
use c137_info::AppState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const WIKI_BASE: &str = "https://wiki.test/wiki/";

pub fn record_json(id: u32, name: &str, status: &str) -> String {
    format!(
        r#"{{"id":{id},"name":"{name}","status":"{status}","species":"Human","type":"","gender":"Female",
        "origin":{{"name":"Earth (C-137)","url":""}},"location":{{"name":"Earth (C-137)","url":""}},
        "image":"https://img.test/{id}.jpeg","episode":["https://api.test/episode/1"],
        "url":"https://api.test/character/{id}","created":"2017-11-04T18:48:46.250Z"}}"#
    )
}

pub fn page_json(count: u32) -> String {
    format!(
        r#"{{"info":{{"count":{count},"pages":1,"next":null,"prev":null}},"results":[]}}"#
    )
}

/// Character API double answering from a path → (status, body) table
///
/// Unknown paths answer 404. With `down` set every call is a network error.
#[derive(Default)]
pub struct RoutedTransport {
    routes: HashMap<String, (u16, String)>,
    down: bool,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RoutedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }

    pub fn route(mut self, path_and_query: &str, status: u16, body: String) -> Self {
        self.routes.insert(path_and_query.to_string(), (status, body));
        self
    }
}

#[async_trait]
impl CharacterTransport for RoutedTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<UpstreamResponse, FetchError> {
        let mut key = path.to_string();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            key = format!("{}?{}", key, pairs.join("&"));
        }
        self.calls.lock().unwrap().push(key.clone());

        if self.down {
            return Err(FetchError::Network("connection refused".into()));
        }

        let (status, body) = self
            .routes
            .get(&key)
            .cloned()
            .unwrap_or((404, r#"{"error":"Character not found"}"#.to_string()));
        Ok(UpstreamResponse { status, body })
    }
}

/// Always picks the same id
pub struct FixedId(pub u32);

impl RandomIdSource for FixedId {
    fn pick(&self, _count: u32) -> u32 {
        self.0
    }
}

/// Retries without real waiting
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 1,
        initial_delay: Duration::from_millis(1),
        attempt_timeout: Duration::from_millis(200),
    }
}

pub struct StubProbe(pub bool);

#[async_trait]
impl EntityProbe for StubProbe {
    async fn exists(&self, _url: &str) -> Result<bool, String> {
        Ok(self.0)
    }
}

/// Renderer serving one fixed page
pub struct StaticRenderer {
    pub html: String,
    pub closed: Arc<Mutex<u32>>,
}

impl StaticRenderer {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            closed: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Ok(Box::new(StaticSession {
            html: self.html.clone(),
            closed: self.closed.clone(),
        }))
    }
}

struct StaticSession {
    html: String,
    closed: Arc<Mutex<u32>>,
}

#[async_trait]
impl BrowserSession for StaticSession {
    async fn navigate(
        &mut self,
        _url: &str,
        _wait_until: WaitUntil,
        _timeout: Duration,
    ) -> Result<(), NavigationError> {
        Ok(())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        Ok(self.html.clone())
    }

    async fn close(self: Box<Self>) {
        *self.closed.lock().unwrap() += 1;
    }
}

/// Completion double with a fixed answer
pub struct CannedCompletion {
    pub reply: Result<String, String>,
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl CannedCompletion {
    pub fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CompletionClient for CannedCompletion {
    fn model(&self) -> &str {
        "canned-model"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        self.requests
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.reply.clone().map_err(|e| CompletionError::Api(500, e))
    }
}

pub const WIKI_PAGE: &str =
    r#"<html><body><div id="mw-content-text"><h2>Biography</h2><p>Scientist.</p></div></body></html>"#;

/// App state over the given doubles
pub fn app_state(
    transport: RoutedTransport,
    pipeline: EnrichmentPipeline,
    about_path: PathBuf,
) -> AppState {
    let characters = CharacterClient::new(Arc::new(transport), fast_policy())
        .with_id_source(Arc::new(FixedId(42)));
    AppState::new(Arc::new(characters), Arc::new(pipeline), about_path)
}

/// Offline pipeline with a short delay
pub fn offline_pipeline() -> EnrichmentPipeline {
    EnrichmentPipeline::new(
        Arc::new(StubProbe(true)),
        Arc::new(StaticRenderer::new(WIKI_PAGE)),
        WIKI_BASE,
    )
    .offline(Duration::from_millis(10))
}

/// Production-mode pipeline over doubles
pub fn online_pipeline(
    entity_exists: bool,
    completion: Option<Arc<dyn CompletionClient>>,
) -> EnrichmentPipeline {
    EnrichmentPipeline::new(
        Arc::new(StubProbe(entity_exists)),
        Arc::new(StaticRenderer::new(WIKI_PAGE)),
        WIKI_BASE,
    )
    .with_completion(completion)
}
