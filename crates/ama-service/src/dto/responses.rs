//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Room Responses
// ============================================================================

/// Room response
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub user_id: Uuid,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Message Responses
// ============================================================================

/// Message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub room_id: i64,
    pub message: String,
    pub reaction_count: i64,
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Returned when a message is created
#[derive(Debug, Clone, Serialize)]
pub struct CreatedMessageResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Returned when a message is answered
#[derive(Debug, Clone, Serialize)]
pub struct AnsweredMessageResponse {
    pub id: Uuid,
    pub answer: String,
}

// ============================================================================
// Reaction Responses
// ============================================================================

/// Reaction count after an add or remove
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReactionCountResponse {
    pub count: i64,
}

/// Messages of a room the caller has reacted to
#[derive(Debug, Clone, Serialize)]
pub struct ReactedMessagesResponse {
    pub ids: Vec<Uuid>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    /// `database_healthy` is `None` when no database backs the service
    pub fn ready(database_healthy: Option<bool>) -> Self {
        let database = match database_healthy {
            Some(true) => "healthy",
            Some(false) => "unhealthy",
            None => "disabled",
        };
        Self {
            status: if database_healthy == Some(false) {
                "not_ready"
            } else {
                "ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database.to_string(),
            },
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
