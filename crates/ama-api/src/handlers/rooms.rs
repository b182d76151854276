//! Room handlers
//!
//! Endpoints for room operations.

use ama_service::{CreateRoomRequest, RoomResponse, RoomService};
use axum::{extract::State, Json};

use crate::extractors::{AuthUser, RoomPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create room
///
/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let room = service
        .create_room(auth.user_id, &auth.name, request)
        .await?;
    Ok(Created(Json(room)))
}

/// List rooms, oldest first
///
/// GET /api/rooms
pub async fn list_rooms(State(state): State<AppState>) -> ApiResult<Json<Vec<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let rooms = service.list_rooms().await?;
    Ok(Json(rooms))
}

/// Get room by ID
///
/// GET /api/rooms/{room_id}
pub async fn get_room(
    State(state): State<AppState>,
    path: RoomPath,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.get_room(path.room_id).await?;
    Ok(Json(room))
}
