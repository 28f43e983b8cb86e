//! Server-Sent Events (SSE) utilities
//!
//! Encodes enrichment events as `data: {json}\n\n` frames.

use crate::events::EnrichmentEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, warn};

/// Encode one enrichment event as an unnamed SSE `data:` frame
pub fn to_sse_event(event: &EnrichmentEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Event::default().data(json)),
        Err(e) => {
            warn!("SSE: Failed to serialize {} event: {}", event.event_type(), e);
            None
        }
    }
}

/// Wrap a finite stream of enrichment events in an SSE response
///
/// The response ends when `events` ends. Keep-alive comments are sent while
/// a slow phase (page load, model call) is running.
pub fn enrichment_sse<S>(events: S) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = EnrichmentEvent> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut events = Box::pin(events);
        while let Some(event) = events.next().await {
            debug!("SSE: Sending {} event", event.event_type());
            if let Some(frame) = to_sse_event(&event) {
                yield Ok(frame);
            }
        }
        debug!("SSE: Enrichment stream closed");
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_stream_frames_in_order_then_closes() {
        let events = futures::stream::iter(vec![
            EnrichmentEvent::log("> TARGET_URL: https://wiki.test/wiki/Rick"),
            EnrichmentEvent::complete("report"),
        ]);

        let response = enrichment_sse(events).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        let frames: Vec<&str> = body
            .split("\n\n")
            .filter(|frame| !frame.is_empty())
            .collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].starts_with("data: {\"type\":\"log\""));
        assert_eq!(
            frames[1],
            "data: {\"type\":\"complete\",\"data\":{\"info\":\"report\"}}"
        );
    }
}
