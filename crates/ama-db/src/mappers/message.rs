//! Message entity <-> model mapper

use ama_core::entities::Message;

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: model.id,
            room_id: model.room_id,
            message: model.message,
            reaction_count: model.reaction_count,
            answered: model.answered,
            answer: model.answer,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
