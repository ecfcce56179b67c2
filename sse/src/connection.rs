use axum::response::sse::Event;
use dashmap::DashMap;
use log::*;
use std::convert::Infallible;
use tokio::sync::mpsc::UnboundedSender;

/// Unique identifier for a subscriber (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of connected notification subscribers.
///
/// Every discovery event is broadcast-scoped, so a single map from
/// subscriber id to push channel is all the routing state there is.
/// DashMap gives O(1) register/unregister and iteration that tolerates a
/// subscriber disconnecting mid-broadcast.
pub struct SubscriberRegistry {
    subscribers: DashMap<SubscriberId, UnboundedSender<Result<Event, Infallible>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Register a new subscriber - O(1)
    pub fn register(&self, sender: UnboundedSender<Result<Event, Infallible>>) -> SubscriberId {
        let subscriber_id = SubscriberId::new();
        self.subscribers.insert(subscriber_id.clone(), sender);
        subscriber_id
    }

    /// Unregister a subscriber - O(1), idempotent
    pub fn unregister(&self, subscriber_id: &SubscriberId) {
        self.subscribers.remove(subscriber_id);
    }

    /// Number of currently-registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Send an event to one subscriber. A send failure means the receiving
    /// stream is already gone; it is logged and the subscriber is left for
    /// its handler's cleanup path to unregister.
    pub fn send_to(&self, subscriber_id: &SubscriberId, event: Event) {
        if let Some(sender) = self.subscribers.get(subscriber_id) {
            if let Err(e) = sender.send(Ok(event)) {
                warn!(
                    "Failed to send event to subscriber {}: {}",
                    subscriber_id.as_str(),
                    e
                );
            }
        }
    }

    /// Broadcast an event to all subscribers - O(n). Delivery is
    /// fire-and-forget per subscriber: one dead channel never prevents
    /// delivery to the rest. Dead channels are pruned after iteration
    /// completes; removing mid-iteration would contend with the shard lock.
    pub fn broadcast(&self, event: Event) {
        let mut disconnected = Vec::new();

        for entry in self.subscribers.iter() {
            if let Err(e) = entry.value().send(Ok(event.clone())) {
                warn!(
                    "Failed to send broadcast to subscriber {}: {}. Subscriber will be removed.",
                    entry.key().as_str(),
                    e
                );
                disconnected.push(entry.key().clone());
            }
        }

        for subscriber_id in disconnected {
            self.unregister(&subscriber_id);
        }
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_broadcast_reaches_every_registered_subscriber() {
        let registry = SubscriberRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.register(tx1);
        registry.register(tx2);
        registry.broadcast(Event::default().data("{}"));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
        assert!(rx1.try_recv().is_err(), "exactly one copy per subscriber");
    }

    #[tokio::test]
    async fn test_unregistered_subscriber_receives_nothing() {
        let registry = SubscriberRegistry::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        let id = registry.register(tx1);
        registry.register(tx2);
        registry.unregister(&id);
        registry.broadcast(Event::default().data("{}"));

        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = SubscriberRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = registry.register(tx);
        registry.unregister(&id);
        registry.unregister(&id);

        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_survives_a_dropped_receiver() {
        let registry = SubscriberRegistry::new();
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        registry.register(tx1);
        registry.register(tx2);
        drop(rx1);

        registry.broadcast(Event::default().data("{}"));

        assert!(rx2.try_recv().is_ok());
        assert_eq!(registry.len(), 1, "dead channel should be pruned");
    }
}
