//! Message handlers
//!
//! Endpoints for posting, answering and reading questions.

use ama_service::{
    AnswerMessageRequest, AnsweredMessageResponse, CreateMessageRequest, CreatedMessageResponse,
    MessageResponse, MessageService,
};
use axum::{extract::State, Json};

use crate::extractors::{AuthUser, MessagePath, RoomPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Get messages in room, newest first
///
/// GET /api/rooms/{room_id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    path: RoomPath,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let messages = service.list_messages(path.room_id).await?;
    Ok(Json(messages))
}

/// Create message
///
/// POST /api/rooms/{room_id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    path: RoomPath,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<CreatedMessageResponse>>> {
    tracing::debug!(user_id = %auth.user_id, room_id = path.room_id, "Posting message");

    let service = MessageService::new(state.service_context());
    let response = service.create_message(path.room_id, request).await?;
    Ok(Created(Json(response)))
}

/// Get message by ID
///
/// GET /api/rooms/{room_id}/messages/{message_id}
pub async fn get_message(
    State(state): State<AppState>,
    path: MessagePath,
) -> ApiResult<Json<MessageResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.get_message(path.room_id, path.message_id).await?;
    Ok(Json(response))
}

/// Answer message
///
/// PATCH /api/rooms/{room_id}/messages/{message_id}/answer
pub async fn answer_message(
    State(state): State<AppState>,
    auth: AuthUser,
    path: MessagePath,
    ValidatedJson(request): ValidatedJson<AnswerMessageRequest>,
) -> ApiResult<Json<AnsweredMessageResponse>> {
    tracing::debug!(user_id = %auth.user_id, message_id = %path.message_id, "Answering message");

    let service = MessageService::new(state.service_context());
    let response = service
        .answer_message(path.room_id, path.message_id, request)
        .await?;
    Ok(Json(response))
}
