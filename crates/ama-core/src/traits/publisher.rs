//! Event publisher port
//!
//! Services hand committed events to a publisher. Delivery is best-effort:
//! `publish` never blocks on subscribers and never reports their failures.

use crate::events::EventEnvelope;

pub trait EventPublisher: Send + Sync {
    /// Queue an envelope for fan-out
    fn publish(&self, envelope: EventEnvelope);
}

/// Publisher that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _envelope: EventEnvelope) {}
}
