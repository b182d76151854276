//! Message entity - a question posted into a room

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Message entity
///
/// `reaction_count` is derived from the reaction rows at read time and is
/// never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub room_id: i64,
    pub message: String,
    pub reaction_count: i64,
    pub answered: bool,
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new, unanswered Message
    pub fn new(id: Uuid, room_id: i64, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            room_id,
            message: message.into(),
            reaction_count: 0,
            answered: false,
            answer: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if message belongs to the given room
    #[inline]
    pub fn belongs_to(&self, room_id: i64) -> bool {
        self.room_id == room_id
    }

    /// Apply the one-way answered transition.
    ///
    /// Returns `false` and leaves the message untouched if it was already answered.
    pub fn mark_answered(&mut self, answer: impl Into<String>) -> bool {
        if self.answered {
            return false;
        }
        self.answered = true;
        self.answer = Some(answer.into());
        self.updated_at = Utc::now();
        true
    }

    /// Check if message content is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty()
    }
}
