//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the subscription endpoint.
//! The core SSE infrastructure (Manager, SubscriberRegistry, wire events)
//! lives in the `sse` crate to avoid circular dependencies.

pub mod handler;
