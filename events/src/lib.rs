//! Event system infrastructure for the inkdrop watch server.
//!
//! This crate provides the event system that decouples filesystem watching
//! from infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing observable events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (domain, sse, etc.),
//! avoiding circular dependencies. Leaf types shared across layers, such as
//! `MediaKind`, live here for the same reason.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The capability tag assigned to a qualifying file based on its extension.
/// Classification itself (the extension allow-lists) lives in the `domain`
/// crate; consumers only ever see this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// Events that represent observable changes in the watched folder.
/// These events are emitted by the folder watch loop when a qualifying
/// file appears.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted when a new qualifying media file is discovered in the watched
    /// folder. Triggers SSE notifications to every connected subscriber.
    MediaDiscovered {
        /// Bare file name (no directory components) of the discovered file.
        file_name: String,
        /// Capability tag derived from the file extension.
        kind: MediaKind,
        /// Public URL under the server's static file mount where the file
        /// can be retrieved by a browser.
        url: String,
    },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially in registration order.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        seen: AtomicUsize,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: &DomainEvent) {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn discovered(file_name: &str) -> DomainEvent {
        DomainEvent::MediaDiscovered {
            file_name: file_name.to_string(),
            kind: MediaKind::Image,
            url: format!("http://localhost:3001/files/Mock/{file_name}"),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_handler() {
        let first = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
        });
        let second = Arc::new(CountingHandler {
            seen: AtomicUsize::new(0),
        });

        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        publisher.publish(discovered("comic.png")).await;

        assert_eq!(first.seen.load(Ordering::SeqCst), 1);
        assert_eq!(second.seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_publish_without_handlers_is_a_noop() {
        EventPublisher::new().publish(discovered("comic.png")).await;
    }
}
