//! Message service
//!
//! Handles question posting, answering, and queries.

use ama_core::entities::Message;
use ama_core::{DomainError, EventEnvelope};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::{
    AnswerMessageRequest, AnsweredMessageResponse, CreateMessageRequest, CreatedMessageResponse,
    MessageResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::room::RoomService;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a question into a room
    #[instrument(skip(self, request))]
    pub async fn create_message(
        &self,
        room_id: i64,
        request: CreateMessageRequest,
    ) -> ServiceResult<CreatedMessageResponse> {
        let content = request.message.trim();
        if content.is_empty() {
            return Err(DomainError::BlankField { field: "message" }.into());
        }

        RoomService::new(self.ctx).ensure_exists(room_id).await?;

        let message = Message::new(Uuid::new_v4(), room_id, content);
        let message = self.ctx.message_repo().create(&message).await?;

        info!(message_id = %message.id, room_id, "Message created");

        self.ctx
            .publisher()
            .publish(EventEnvelope::message_created(&message));

        Ok(CreatedMessageResponse::from(&message))
    }

    /// Messages of a room, newest first
    #[instrument(skip(self))]
    pub async fn list_messages(&self, room_id: i64) -> ServiceResult<Vec<MessageResponse>> {
        RoomService::new(self.ctx).ensure_exists(room_id).await?;

        let messages = self.ctx.message_repo().find_by_room(room_id).await?;
        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    /// Get one message of a room
    #[instrument(skip(self))]
    pub async fn get_message(&self, room_id: i64, message_id: Uuid) -> ServiceResult<MessageResponse> {
        let message = self.find_in_room(room_id, message_id).await?;
        Ok(MessageResponse::from(message))
    }

    /// Answer a question.
    ///
    /// The answered transition is one-way; a second answer fails with
    /// `MESSAGE_ALREADY_ANSWERED` and publishes nothing.
    #[instrument(skip(self, request))]
    pub async fn answer_message(
        &self,
        room_id: i64,
        message_id: Uuid,
        request: AnswerMessageRequest,
    ) -> ServiceResult<AnsweredMessageResponse> {
        let answer = request.answer.trim();
        if answer.is_empty() {
            return Err(DomainError::BlankField { field: "answer" }.into());
        }

        self.find_in_room(room_id, message_id).await?;

        if !self.ctx.message_repo().mark_answered(message_id, answer).await? {
            debug!(message_id = %message_id, "Message already answered");
            return Err(DomainError::MessageAlreadyAnswered.into());
        }

        info!(message_id = %message_id, room_id, "Message answered");

        self.ctx
            .publisher()
            .publish(EventEnvelope::message_answered(room_id, message_id, answer));

        Ok(AnsweredMessageResponse {
            id: message_id,
            answer: answer.to_string(),
        })
    }

    /// Resolve a message, reporting one from another room as unknown
    pub(crate) async fn find_in_room(&self, room_id: i64, message_id: Uuid) -> ServiceResult<Message> {
        RoomService::new(self.ctx).ensure_exists(room_id).await?;

        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|message| message.belongs_to(room_id))
            .ok_or(DomainError::MessageNotFound(message_id))?;

        Ok(message)
    }
}
