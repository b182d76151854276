//! Reaction service
//!
//! Handles upvotes on questions. Each user reacts to a message at most once;
//! the repository enforces the pair uniqueness and reports the count it
//! observed after committing.

use ama_core::EventEnvelope;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{ReactedMessagesResponse, ReactionCountResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::message::MessageService;
use super::room::RoomService;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add the caller's reaction to a message
    #[instrument(skip(self))]
    pub async fn add_reaction(
        &self,
        room_id: i64,
        message_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<ReactionCountResponse> {
        MessageService::new(self.ctx)
            .find_in_room(room_id, message_id)
            .await?;

        let count = self.ctx.reaction_repo().add(message_id, user_id).await?;

        info!(message_id = %message_id, user_id = %user_id, count, "Reaction added");

        self.ctx
            .publisher()
            .publish(EventEnvelope::reaction_added(room_id, message_id, count));

        Ok(ReactionCountResponse { count })
    }

    /// Remove the caller's reaction from a message
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        room_id: i64,
        message_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<ReactionCountResponse> {
        MessageService::new(self.ctx)
            .find_in_room(room_id, message_id)
            .await?;

        let count = self.ctx.reaction_repo().remove(message_id, user_id).await?;

        info!(message_id = %message_id, user_id = %user_id, count, "Reaction removed");

        self.ctx
            .publisher()
            .publish(EventEnvelope::reaction_removed(room_id, message_id, count));

        Ok(ReactionCountResponse { count })
    }

    /// Messages of a room the user has reacted to
    #[instrument(skip(self))]
    pub async fn reacted_message_ids(
        &self,
        room_id: i64,
        user_id: Uuid,
    ) -> ServiceResult<ReactedMessagesResponse> {
        RoomService::new(self.ctx).ensure_exists(room_id).await?;

        let ids = self
            .ctx
            .reaction_repo()
            .message_ids_for_user(room_id, user_id)
            .await?;

        Ok(ReactedMessagesResponse { ids })
    }
}
