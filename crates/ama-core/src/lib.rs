//! # ama-core
//!
//! Domain layer containing entities, repository traits, and the events pushed
//! to real-time subscribers.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{Message, NewRoom, Reaction, Room, MAX_ROOM_DESCRIPTION_LEN};
pub use error::DomainError;
pub use events::{
    EventEnvelope, EventScope, MessageAnsweredEvent, MessageCreatedEvent, ReactionCountEvent,
    RoomCreatedEvent, RoomEvent,
};
pub use traits::{
    EventPublisher, MessageRepository, NoopPublisher, ReactionRepository, RepoResult,
    RoomRepository,
};
