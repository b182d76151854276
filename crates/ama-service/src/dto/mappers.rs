//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use ama_core::entities::{Message, Room};

use super::responses::{CreatedMessageResponse, MessageResponse, RoomResponse};

// ============================================================================
// Room Mappers
// ============================================================================

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            description: room.description.clone(),
            user_id: room.user_id,
            creator_name: room.creator_name.clone(),
            created_at: room.created_at,
        }
    }
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            description: room.description,
            user_id: room.user_id,
            creator_name: room.creator_name,
            created_at: room.created_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            room_id: message.room_id,
            message: message.message.clone(),
            reaction_count: message.reaction_count,
            answered: message.answered,
            answer: message.answer.clone(),
            created_at: message.created_at,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

impl From<&Message> for CreatedMessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            created_at: message.created_at,
        }
    }
}
