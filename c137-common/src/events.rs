//! Enrichment stream event types
//!
//! One enrichment run produces zero or more `log` events followed by exactly
//! one terminal event (`complete` or `error`). Events serialize to the JSON
//! shapes the browser client consumes:
//!
//! ```json
//! {"type":"log","message":"> TARGET_URL: ...","timestamp":"10/19/2026, 03:04:05 PM UTC"}
//! {"type":"complete","data":{"info":"..."}}
//! {"type":"error","message":"..."}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message used when a failure carries no description of its own
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Final payload of a successful enrichment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    /// Free-text intelligence report
    pub info: String,
}

/// Progress and terminal events of one enrichment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnrichmentEvent {
    /// Human-readable progress line
    Log { message: String, timestamp: String },

    /// Run finished with a report
    Complete { data: EnrichmentReport },

    /// Run failed
    Error { message: String },
}

impl EnrichmentEvent {
    /// Progress line stamped with the current time
    pub fn log(message: impl Into<String>) -> Self {
        Self::log_at(message, Utc::now())
    }

    pub fn log_at(message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::Log {
            message: message.into(),
            timestamp: format_timestamp(at),
        }
    }

    pub fn complete(info: impl Into<String>) -> Self {
        Self::Complete {
            data: EnrichmentReport { info: info.into() },
        }
    }

    /// Error event; blank messages become [`GENERIC_ERROR_MESSAGE`]
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self::Error { message }
    }

    /// Terminal event for a finished run
    pub fn terminal<E: std::fmt::Display>(outcome: Result<String, E>) -> Self {
        match outcome {
            Ok(info) => Self::complete(info),
            Err(e) => Self::error(e.to_string()),
        }
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Log { .. })
    }

    /// Event type name as it appears in the JSON `type` field
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Log { .. } => "log",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
        }
    }
}

/// `MM/DD/YYYY, hh:mm:ss AM UTC`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%m/%d/%Y, %I:%M:%S %p UTC").to_string()
}
