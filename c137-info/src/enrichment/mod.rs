//! Streaming enrichment pipeline
//!
//! Scrapes a character's wiki page, budgets the extracted text, and asks a
//! completion model for an intelligence report, reporting progress as it goes.

pub mod browser;
pub mod budget;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod prompt;

pub use browser::{
    BrowserError, BrowserSession, HttpPageRenderer, NavigationError, PageRenderer, WaitUntil,
};
pub use llm::{CompletionClient, CompletionError, OpenAiClient};
pub use pipeline::{EnrichmentError, EnrichmentPhase, EnrichmentPipeline, OFFLINE_DELAY};
pub use probe::{EntityProbe, HttpProbe};
pub use progress::ProgressLog;
pub use prompt::{PromptTemplate, ERROR_PAGE_SYSTEM_PROMPT};
