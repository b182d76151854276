//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Blank-after-trim checks happen in the services, which own the trimming.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Room Requests
// ============================================================================

/// Create room request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100, message = "Room name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Post a question into a room
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

/// Answer a question
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Answer must be 1-2000 characters"))]
    pub answer: String,
}
