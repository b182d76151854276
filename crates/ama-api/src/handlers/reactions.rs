//! Reaction handlers

use ama_service::{ReactedMessagesResponse, ReactionCountResponse, ReactionService};
use axum::{extract::State, Json};

use crate::extractors::{AuthUser, MessagePath, RoomPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Add own reaction
///
/// PATCH /api/rooms/{room_id}/messages/{message_id}/react
pub async fn add_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    path: MessagePath,
) -> ApiResult<Json<ReactionCountResponse>> {
    let service = ReactionService::new(state.service_context());
    let count = service
        .add_reaction(path.room_id, path.message_id, auth.user_id)
        .await?;
    Ok(Json(count))
}

/// Remove own reaction
///
/// DELETE /api/rooms/{room_id}/messages/{message_id}/react
pub async fn remove_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    path: MessagePath,
) -> ApiResult<Json<ReactionCountResponse>> {
    let service = ReactionService::new(state.service_context());
    let count = service
        .remove_reaction(path.room_id, path.message_id, auth.user_id)
        .await?;
    Ok(Json(count))
}

/// Messages of the room the caller has reacted to
///
/// GET /api/rooms/{room_id}/reactions
pub async fn get_reacted_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    path: RoomPath,
) -> ApiResult<Json<ReactedMessagesResponse>> {
    let service = ReactionService::new(state.service_context());
    let reacted = service
        .reacted_message_ids(path.room_id, auth.user_id)
        .await?;
    Ok(Json(reacted))
}
