//! Path parameter extractors
//!
//! Typed extraction of room and message ids, rejecting malformed ids with 400.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::response::ApiError;

#[derive(Debug, Deserialize)]
struct RawRoomPath {
    room_id: String,
}

#[derive(Debug, Deserialize)]
struct RawMessagePath {
    room_id: String,
    message_id: String,
}

/// `/rooms/:room_id`
#[derive(Debug, Clone, Copy)]
pub struct RoomPath {
    pub room_id: i64,
}

/// `/rooms/:room_id/messages/:message_id`
#[derive(Debug, Clone, Copy)]
pub struct MessagePath {
    pub room_id: i64,
    pub message_id: Uuid,
}

fn parse_room_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid room_id format"))
}

fn parse_message_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid message_id format"))
}

#[async_trait]
impl<S> FromRequestParts<S> for RoomPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawRoomPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(Self {
            room_id: parse_room_id(&raw.room_id)?,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MessagePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawMessagePath>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.body_text()))?;

        Ok(Self {
            room_id: parse_room_id(&raw.room_id)?,
            message_id: parse_message_id(&raw.message_id)?,
        })
    }
}
