//! # C-137-INFO Common Library
//!
//! Shared code for the C-137-INFO service:
//! - Error type and result alias
//! - TOML bootstrap configuration
//! - Enrichment stream event types and SSE encoding
//! - Site preferences over an injected key/value store
//! - Key-sequence matcher (Konami code)
//! - Random word and name generators

pub mod config;
pub mod error;
pub mod events;
pub mod konami;
pub mod prefs;
pub mod sse;
pub mod words;

pub use error::{Error, Result};
pub use events::{EnrichmentEvent, EnrichmentReport};
