//! Room entity - an AMA session that participants post questions into

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum length of a room description, in characters
pub const MAX_ROOM_DESCRIPTION_LEN: usize = 255;

/// Room entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub user_id: Uuid,
    pub creator_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Check if the room carries a description
    #[inline]
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// Check if the given user created this room
    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Input for room creation. Storage assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub description: String,
    pub user_id: Uuid,
    pub creator_name: String,
}

impl NewRoom {
    /// Create a new room request, trimming the name and defaulting the description
    pub fn new(
        name: &str,
        description: Option<&str>,
        user_id: Uuid,
        creator_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.map(str::trim).unwrap_or_default().to_string(),
            user_id,
            creator_name: creator_name.into(),
        }
    }

    /// Materialize the room once storage has assigned its identity
    pub fn into_room(self, id: i64, created_at: DateTime<Utc>) -> Room {
        Room {
            id,
            name: self.name,
            description: self.description,
            user_id: self.user_id,
            creator_name: self.creator_name,
            created_at,
            updated_at: created_at,
        }
    }
}
