//! Room entity <-> model mapper

use ama_core::entities::Room;

use crate::models::RoomModel;

/// Convert RoomModel to Room entity
impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        Room {
            id: model.id,
            name: model.name,
            description: model.description,
            user_id: model.user_id,
            creator_name: model.creator_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
