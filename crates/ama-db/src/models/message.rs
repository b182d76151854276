//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for messages joined with their reaction count
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: Uuid,
    pub room_id: i64,
    pub message: String,
    pub answered: bool,
    pub answer: Option<String>,
    pub reaction_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MessageModel {
    /// Check if message has been answered
    #[inline]
    pub fn is_answered(&self) -> bool {
        self.answered
    }
}
