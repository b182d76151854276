//! Reaction entity - a user's upvote on a message

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Reaction entity. `(message_id, user_id)` is its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(message_id: Uuid, user_id: Uuid) -> Self {
        Self {
            message_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Check if this reaction is the given (message, user) pair
    #[inline]
    pub fn is_pair(&self, message_id: Uuid, user_id: Uuid) -> bool {
        self.message_id == message_id && self.user_id == user_id
    }
}
