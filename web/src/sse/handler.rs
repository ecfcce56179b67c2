use crate::AppState;
use async_stream::stream;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc;

/// SSE handler that establishes a long-lived push subscription. The manager
/// pushes an empty comment frame on registration, so the client sees the
/// transport confirmed before any discovery event arrives.
pub(crate) async fn events_handler(
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing SSE subscription");

    let (tx, mut rx) = mpsc::unbounded_channel();

    let subscriber_id = app_state.sse_manager.register_subscriber(tx);
    let manager = app_state.sse_manager.clone();

    // Create the stream - events arrive from the channel
    // The channel sends Result<Event, Infallible>, so we just pass them through
    let stream = stream! {
        while let Some(event) = rx.recv().await {
            yield event;
        }

        // Subscription closed, clean up
        debug!("SSE subscription closed, cleaning up");
        manager.unregister_subscriber(&subscriber_id);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
