//! Server-Sent Events (SSE) infrastructure for real-time media discovery
//! notifications.
//!
//! # Architecture
//!
//! - **Broadcast-only scoping**: every connected subscriber receives every
//!   discovery event; subscribers are anonymous localhost browsers, so there
//!   is no per-user routing index.
//! - **Ephemeral events**: if no subscriber is connected when a file appears,
//!   the event is simply not delivered; clients recover by querying the
//!   snapshot listing on their next request.
//! - **Confirmed transport**: registration pushes an empty comment frame so
//!   the client knows the channel is open before any real event.
//!
//! # Message Flow
//!
//! 1. A client opens `GET /api/events`; the web handler registers a channel
//!    in the [`connection::SubscriberRegistry`]
//! 2. The folder watch loop publishes an `events::DomainEvent` for each
//!    qualifying file
//! 3. [`domain_event_handler::SseDomainEventHandler`] converts it to the wire
//!    payload (`{"imageUrl": ...}`) and hands it to the [`Manager`]
//! 4. The manager broadcasts one framed copy per registered subscriber;
//!    a dead channel is logged and skipped
//!
//! # Modules
//!
//! - `connection`: SubscriberRegistry and type-safe SubscriberId
//! - `manager`: registration plus serialize-and-broadcast
//! - `message`: wire event definitions
//! - `domain_event_handler`: bridge from the events crate to broadcasts

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use manager::Manager;
