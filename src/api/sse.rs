//! Server-Sent Events support

use crate::session::{SessionEvent, SessionSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert a session's broadcast channel to an SSE stream, led by a snapshot
pub fn sse_stream(
    init: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&init)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(session_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn init_event(snapshot: &SessionSnapshot) -> Event {
    let data = json!({
        "type": "init",
        "session": snapshot,
    });
    Event::default().event("init").data(data.to_string())
}

fn session_event_to_axum(event: SessionEvent) -> Event {
    let (event_type, data) = match event {
        SessionEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        SessionEvent::Typing { active } => (
            "typing",
            json!({
                "type": "typing",
                "active": active
            }),
        ),
        SessionEvent::Reset { snapshot } => (
            "reset",
            json!({
                "type": "reset",
                "session": snapshot
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}
