//! Room service
//!
//! Handles room creation and queries.

use ama_core::entities::{NewRoom, Room, MAX_ROOM_DESCRIPTION_LEN};
use ama_core::{DomainError, EventEnvelope};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CreateRoomRequest, RoomResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a room owned by the caller and announce it on the global scope
    #[instrument(skip(self, request))]
    pub async fn create_room(
        &self,
        user_id: Uuid,
        creator_name: &str,
        request: CreateRoomRequest,
    ) -> ServiceResult<RoomResponse> {
        let new_room = NewRoom::new(
            &request.name,
            request.description.as_deref(),
            user_id,
            creator_name,
        );

        if new_room.name.is_empty() {
            return Err(DomainError::BlankField { field: "name" }.into());
        }
        if new_room.description.chars().count() > MAX_ROOM_DESCRIPTION_LEN {
            return Err(DomainError::ContentTooLong {
                max: MAX_ROOM_DESCRIPTION_LEN,
            }
            .into());
        }

        let room = self.ctx.room_repo().create(new_room).await?;

        info!(room_id = room.id, user_id = %user_id, "Room created");

        self.ctx.publisher().publish(EventEnvelope::room_created(&room));

        Ok(RoomResponse::from(room))
    }

    /// All rooms, oldest first
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> ServiceResult<Vec<RoomResponse>> {
        let rooms = self.ctx.room_repo().list().await?;
        Ok(rooms.into_iter().map(RoomResponse::from).collect())
    }

    /// Get a room by ID
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: i64) -> ServiceResult<RoomResponse> {
        let room = self.find_room(room_id).await?;
        Ok(RoomResponse::from(room))
    }

    /// Fail with `UNKNOWN_ROOM` unless the room exists
    pub async fn ensure_exists(&self, room_id: i64) -> ServiceResult<()> {
        if self.ctx.room_repo().exists(room_id).await? {
            Ok(())
        } else {
            Err(DomainError::RoomNotFound(room_id).into())
        }
    }

    async fn find_room(&self, room_id: i64) -> ServiceResult<Room> {
        Ok(self
            .ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))?)
    }
}
