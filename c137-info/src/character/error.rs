//! Character client errors

use std::time::Duration;
use thiserror::Error;

/// Failure of a character API operation
#[derive(Debug, Error)]
pub enum FetchError {
    /// Attempt exceeded its time budget and was cancelled
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(String),

    /// Entity absent upstream
    #[error("Not found: {0}")]
    NotFound(String),

    /// All attempts failed; `source` is the last observed error
    #[error("Failed to fetch {context} after {attempts} attempts: {source}")]
    Exhausted {
        context: String,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout(_) | FetchError::Network(_) | FetchError::Status(_)
        )
    }

    /// Innermost error, looking through `Exhausted`
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::Exhausted { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), FetchError::NotFound(_))
    }
}
