//! Event envelope - a room event plus the scope it is routed to

use std::fmt;

use uuid::Uuid;

use super::room_event::{
    MessageAnsweredEvent, ReactionCountEvent, RoomCreatedEvent, RoomEvent,
};
use crate::entities::{Message, Room};

/// Routing key for an event: one room, or the global room list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventScope {
    Room(i64),
    Global,
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room(id) => write!(f, "room:{id}"),
            Self::Global => f.write_str("global"),
        }
    }
}

/// An event bound to its scope.
///
/// The scope is routing metadata only; [`EventEnvelope::to_json`] serializes
/// the event alone. Constructors pair every kind with the scope it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    scope: EventScope,
    event: RoomEvent,
}

impl EventEnvelope {
    /// `room_created`, routed to the global room list
    pub fn room_created(room: &Room) -> Self {
        Self {
            scope: EventScope::Global,
            event: RoomEvent::RoomCreated(RoomCreatedEvent::from(room)),
        }
    }

    /// `message_created`, routed to the message's room
    pub fn message_created(message: &Message) -> Self {
        Self {
            scope: EventScope::Room(message.room_id),
            event: RoomEvent::MessageCreated(message.into()),
        }
    }

    /// `reaction_added` with the count observed after commit
    pub fn reaction_added(room_id: i64, message_id: Uuid, count: i64) -> Self {
        Self {
            scope: EventScope::Room(room_id),
            event: RoomEvent::ReactionAdded(ReactionCountEvent {
                id: message_id,
                count,
            }),
        }
    }

    /// `reaction_removed` with the count observed after commit
    pub fn reaction_removed(room_id: i64, message_id: Uuid, count: i64) -> Self {
        Self {
            scope: EventScope::Room(room_id),
            event: RoomEvent::ReactionRemoved(ReactionCountEvent {
                id: message_id,
                count,
            }),
        }
    }

    /// `message_answered`, routed to the message's room
    pub fn message_answered(room_id: i64, message_id: Uuid, answer: impl Into<String>) -> Self {
        Self {
            scope: EventScope::Room(room_id),
            event: RoomEvent::MessageAnswered(MessageAnsweredEvent {
                id: message_id,
                answer: answer.into(),
            }),
        }
    }

    #[inline]
    pub fn scope(&self) -> EventScope {
        self.scope
    }

    #[inline]
    pub fn event(&self) -> &RoomEvent {
        &self.event
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.event.kind()
    }

    /// Serialize the wire frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.event)
    }
}
