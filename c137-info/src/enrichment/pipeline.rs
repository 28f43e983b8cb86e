//! Enrichment run state machine
//!
//! `Idle → Validating → Scraping → Extracting → Summarizing → Complete | Failed`
//!
//! Each run reports progress through a [`ProgressLog`] and resolves to exactly
//! one outcome. [`EnrichmentPipeline::stream`] turns a run into an ordered
//! event stream that always ends with a single terminal event.

use super::browser::{
    BrowserError, BrowserSession, NavigationError, PageRenderer, WaitUntil,
    PRIMARY_NAVIGATION_TIMEOUT, RETRY_NAVIGATION_TIMEOUT,
};
use super::budget::{apply_budget, Budgeted};
use super::extract::{extract_content, extraction_failed_text};
use super::llm::{CompletionClient, CompletionError};
use super::probe::EntityProbe;
use super::progress::ProgressLog;
use super::prompt::PromptTemplate;
use c137_common::events::GENERIC_ERROR_MESSAGE;
use c137_common::EnrichmentEvent;
use futures::Stream;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

/// Artificial processing time in offline mode
pub const OFFLINE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("The robot is not properly configured. The API key is missing!")]
    Configuration,

    #[error("Could not find that entity in the Citadel personnel and known entities data stores. :(")]
    EntityNotFound,

    #[error("Entity validation request failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl EnrichmentError {
    /// Whether the failure means "no such character" rather than a broken run
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentPhase {
    Idle,
    Validating,
    Scraping,
    Extracting,
    Summarizing,
    Complete,
    Failed,
}

impl fmt::Display for EnrichmentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Scraping => "scraping",
            Self::Extracting => "extracting",
            Self::Summarizing => "summarizing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Current phase of one run
struct PhaseTracker {
    phase: EnrichmentPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: EnrichmentPhase::Idle,
        }
    }

    fn enter(&mut self, next: EnrichmentPhase) {
        debug!(from = %self.phase, to = %next, "Enrichment phase transition");
        self.phase = next;
    }
}

/// Canned offline-mode report
pub fn offline_report(character_name: &str) -> String {
    format!(
        "DEV MODE: This is a placeholder response for character \"{}\". In production, this would fetch real data from the Rick and Morty Wiki.",
        character_name.replacen(' ', "_", 1)
    )
}

/// Wiki scrape + summarize pipeline
pub struct EnrichmentPipeline {
    probe: Arc<dyn EntityProbe>,
    renderer: Arc<dyn PageRenderer>,
    completion: Option<Arc<dyn CompletionClient>>,
    prompt: PromptTemplate,
    wiki_base_url: String,
    offline_delay: Option<Duration>,
    primary_timeout: Duration,
    retry_timeout: Duration,
}

impl EnrichmentPipeline {
    /// `wiki_base_url` is prefixed verbatim to the character name
    pub fn new(
        probe: Arc<dyn EntityProbe>,
        renderer: Arc<dyn PageRenderer>,
        wiki_base_url: impl Into<String>,
    ) -> Self {
        Self {
            probe,
            renderer,
            completion: None,
            prompt: PromptTemplate::default(),
            wiki_base_url: wiki_base_url.into(),
            offline_delay: None,
            primary_timeout: PRIMARY_NAVIGATION_TIMEOUT,
            retry_timeout: RETRY_NAVIGATION_TIMEOUT,
        }
    }

    /// Without a completion client every production run fails with
    /// [`EnrichmentError::Configuration`]
    pub fn with_completion(mut self, completion: Option<Arc<dyn CompletionClient>>) -> Self {
        self.completion = completion;
        self
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Skip scraping and summarizing; answer with a canned report after `delay`
    pub fn offline(mut self, delay: Duration) -> Self {
        self.offline_delay = Some(delay);
        self
    }

    pub fn with_navigation_timeouts(mut self, primary: Duration, retry: Duration) -> Self {
        self.primary_timeout = primary;
        self.retry_timeout = retry;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.offline_delay.is_some()
    }

    /// Wiki page URL for a character name (no normalization)
    pub fn target_url(&self, character_name: &str) -> String {
        format!("{}{}", self.wiki_base_url, character_name)
    }

    /// Run the whole pipeline for one character
    pub async fn run(
        &self,
        character_name: &str,
        progress: &ProgressLog,
    ) -> Result<String, EnrichmentError> {
        let span = tracing::info_span!("enrichment", run_id = %Uuid::new_v4(), character = %character_name);

        async {
            let mut phase = PhaseTracker::new();
            let outcome = self.run_phases(character_name, progress, &mut phase).await;
            match &outcome {
                Ok(report) => {
                    phase.enter(EnrichmentPhase::Complete);
                    debug!(report_chars = report.chars().count(), "Enrichment complete");
                }
                Err(e) => {
                    phase.enter(EnrichmentPhase::Failed);
                    warn!(error = %e, "Enrichment failed");
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Run without a progress listener
    pub async fn report(&self, character_name: &str) -> Result<String, EnrichmentError> {
        self.run(character_name, &ProgressLog::discard()).await
    }

    /// Run in a background task and stream its events
    ///
    /// Log events come first, in emission order; the last item is always the
    /// single `complete` or `error` event. Dropping the stream does not stop
    /// the run.
    pub fn stream(self: Arc<Self>, character_name: String) -> impl Stream<Item = EnrichmentEvent> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let progress = ProgressLog::new(tx);
            let outcome = self.run(&character_name, &progress).await;
            progress.finish(EnrichmentEvent::terminal(outcome));
        });

        async_stream::stream! {
            let mut finished = false;
            while let Some(event) = rx.recv().await {
                let terminal = event.is_terminal();
                yield event;
                if terminal {
                    finished = true;
                    break;
                }
            }
            if !finished {
                // Runner task died before reporting
                yield EnrichmentEvent::error(GENERIC_ERROR_MESSAGE);
            }
        }
    }

    async fn run_phases(
        &self,
        character_name: &str,
        progress: &ProgressLog,
        phase: &mut PhaseTracker,
    ) -> Result<String, EnrichmentError> {
        if let Some(delay) = self.offline_delay {
            progress.log("> DEV_MODE: Bypassing web scraper");
            progress.log("> MOCK_DATA: Generating placeholder response");
            progress.log("> STATUS: Development environment detected");
            tokio::time::sleep(delay).await;
            return Ok(offline_report(character_name));
        }

        let url = self.target_url(character_name);
        progress.log(format!("> TARGET_URL: {}", url));

        let completion = self
            .completion
            .clone()
            .ok_or(EnrichmentError::Configuration)?;

        phase.enter(EnrichmentPhase::Validating);
        progress.log("> VALIDATING_TARGET_ENTITY...");
        let exists = self
            .probe
            .exists(&url)
            .await
            .map_err(EnrichmentError::Validation)?;
        if !exists {
            return Err(EnrichmentError::EntityNotFound);
        }
        progress.log("> ENTITY_FOUND: Proceeding with data extraction");

        phase.enter(EnrichmentPhase::Scraping);
        progress.log("> INITIALIZING_BROWSER...");
        let mut session = self.renderer.launch().await?;
        progress.log("> BROWSER_LAUNCHED: Opening page");

        let scraped = self
            .scrape(session.as_mut(), &url, character_name, progress, phase)
            .await;
        let budgeted = match scraped {
            Ok(budgeted) => budgeted,
            Err(e) => {
                session.close().await;
                return Err(e);
            }
        };

        phase.enter(EnrichmentPhase::Summarizing);
        progress.log("> CLOSING_BROWSER: Cleanup complete");
        session.close().await;

        progress.log("> INITIALIZING_AI_ANALYSIS...");
        progress.log(format!("> MODEL: {}", completion.model()));
        progress.log(format!("> PROMPT: {}", self.prompt.label));

        let user_message = self.prompt.render_user(character_name, &budgeted.text);
        let info = completion.complete(&self.prompt.system, &user_message).await?;

        progress.log("> AI_ANALYSIS: Processing response...");
        progress.log("> ANALYSIS_COMPLETE: Entity profile generated");
        progress.log("> STATUS: Mission successful");

        Ok(info)
    }

    /// Navigate, extract and budget; the caller owns closing the session
    async fn scrape(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        character_name: &str,
        progress: &ProgressLog,
        phase: &mut PhaseTracker,
    ) -> Result<Budgeted, EnrichmentError> {
        progress.log("> PAGE_READY: Navigating to target");

        match session
            .navigate(url, WaitUntil::DomContentLoaded, self.primary_timeout)
            .await
        {
            Ok(()) => progress.log("> NAVIGATION_COMPLETE: Extracting data"),
            Err(NavigationError::Timeout(_)) => {
                progress.log("> NAVIGATION_TIMEOUT: Retrying with reduced timeout...");
                match session
                    .navigate(url, WaitUntil::Load, self.retry_timeout)
                    .await
                {
                    Ok(()) => progress.log("> NAVIGATION_RETRY_SUCCESS: Extracting data"),
                    Err(e) => {
                        debug!(error = %e, "Navigation retry failed");
                        progress.log("> NAVIGATION_FAILED: Attempting data extraction anyway...");
                    }
                }
            }
            Err(e) => return Err(e.into()),
        }

        phase.enter(EnrichmentPhase::Extracting);
        let content = match session.content().await {
            Ok(html) => extract_content(&html),
            Err(e) => {
                debug!(error = %e, "Page content unavailable");
                progress.log("> DATA_EXTRACTION_ERROR: Using fallback method...");
                extraction_failed_text(character_name)
            }
        };
        progress.log(format!(
            "> DATA_EXTRACTED: {} characters retrieved",
            content.chars().count()
        ));

        let budgeted = apply_budget(content);
        progress.log(format!("> TOKEN_ESTIMATION: ~{} tokens", budgeted.estimated_tokens));
        if budgeted.truncated {
            progress.log("> CONTENT_TRUNCATED: Optimizing for token limits");
        }

        Ok(budgeted)
    }
}
