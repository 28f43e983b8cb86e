//! Progress log sink for one enrichment run

use c137_common::EnrichmentEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Emits `log` events for a run and mirrors them to tracing
///
/// Delivery is best effort: once the receiving side is gone (client
/// disconnected) lines are only traced and the run carries on.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    sender: Option<UnboundedSender<EnrichmentEvent>>,
}

impl ProgressLog {
    pub fn new(sender: UnboundedSender<EnrichmentEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Sink that only traces
    pub fn discard() -> Self {
        Self { sender: None }
    }

    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);

        if let Some(sender) = &self.sender {
            // Receiver dropped means nobody is listening any more
            let _ = sender.send(EnrichmentEvent::log(message));
        }
    }

    /// Send the terminal event
    pub(crate) fn finish(&self, event: EnrichmentEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
