//! Event broadcasting
//!
//! Handles distribution of published events to WebSocket connections.

mod dispatcher;

pub use dispatcher::{DeliveryReport, EventDispatcher, EventDispatcherConfig};
