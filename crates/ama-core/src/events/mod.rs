//! Events pushed to real-time subscribers

mod envelope;
mod room_event;

pub use envelope::{EventEnvelope, EventScope};
pub use room_event::{
    MessageAnsweredEvent, MessageCreatedEvent, ReactionCountEvent, RoomCreatedEvent, RoomEvent,
};
