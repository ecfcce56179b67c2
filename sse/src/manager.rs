use crate::connection::{SubscriberId, SubscriberRegistry};
use crate::message::{Event as SseEvent, EventType};
use axum::response::sse::Event;
use log::*;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct Manager {
    registry: Arc<SubscriberRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new()),
        }
    }

    /// Register a new subscriber and return its unique ID. An empty comment
    /// frame is pushed immediately so the transport is confirmed open before
    /// any real event arrives.
    pub fn register_subscriber(
        &self,
        sender: UnboundedSender<Result<Event, Infallible>>,
    ) -> SubscriberId {
        let subscriber_id = self.registry.register(sender);
        info!("Registered new SSE subscriber");
        self.registry
            .send_to(&subscriber_id, Event::default().comment(""));
        subscriber_id
    }

    /// Unregister a subscriber by ID
    pub fn unregister_subscriber(&self, subscriber_id: &SubscriberId) {
        info!("Unregistering SSE subscriber");
        self.registry.unregister(subscriber_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Serialize an event and broadcast it to every connected subscriber.
    pub fn broadcast(&self, event: SseEvent) {
        let event_data = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                return;
            }
        };

        debug!(
            "Broadcasting {} to {} subscriber(s)",
            event.event_type(),
            self.registry.len()
        );
        self.registry.broadcast(Event::default().data(event_data));
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
