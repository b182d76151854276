//! Room events - state changes pushed to subscribers
//!
//! Each variant carries its own payload. On the wire an event is
//! `{"kind": "...", "value": {...}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Message, Room};

/// All events a subscriber can receive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RoomEvent {
    RoomCreated(RoomCreatedEvent),
    MessageCreated(MessageCreatedEvent),
    ReactionAdded(ReactionCountEvent),
    ReactionRemoved(ReactionCountEvent),
    MessageAnswered(MessageAnsweredEvent),
}

impl RoomEvent {
    /// Get the wire `kind` of the event
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoomCreated(_) => "room_created",
            Self::MessageCreated(_) => "message_created",
            Self::ReactionAdded(_) => "reaction_added",
            Self::ReactionRemoved(_) => "reaction_removed",
            Self::MessageAnswered(_) => "message_answered",
        }
    }
}

// ============================================================================
// Event Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreatedEvent {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub user_id: Uuid,
    pub creator_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreatedEvent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Resulting reaction count of a message after an add or remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCountEvent {
    pub id: Uuid,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAnsweredEvent {
    pub id: Uuid,
    pub answer: String,
}

impl From<&Room> for RoomCreatedEvent {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            created_at: room.created_at,
            name: room.name.clone(),
            user_id: room.user_id,
            creator_name: room.creator_name.clone(),
            description: room.description.clone(),
        }
    }
}

impl From<&Message> for MessageCreatedEvent {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            created_at: message.created_at,
            message: message.message.clone(),
        }
    }
}
