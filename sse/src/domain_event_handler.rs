use crate::message::Event as SseEvent;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE events and broadcasting
/// them to every connected subscriber.
///
/// The watch loop determines what qualifies as a discovery; this handler
/// only translates and routes.
pub struct SseDomainEventHandler {
    sse_manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::MediaDiscovered {
                file_name,
                kind,
                url,
            } => {
                debug!("Handling MediaDiscovered event for {kind} file {file_name}");

                self.sse_manager.broadcast(SseEvent::MediaDiscovered {
                    image_url: url.clone(),
                    media_kind: *kind,
                });
            }
        }
    }
}
