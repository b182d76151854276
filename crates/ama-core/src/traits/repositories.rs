//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Implementations are the arbiter of
//! reaction uniqueness and of the answered transition; callers never lock
//! around them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Message, NewRoom, Room};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Insert a room; storage assigns the id and timestamps
    async fn create(&self, room: NewRoom) -> RepoResult<Room>;

    /// Find room by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Room>>;

    /// Check if a room exists
    async fn exists(&self, id: i64) -> RepoResult<bool>;

    /// All rooms, oldest first
    async fn list(&self) -> RepoResult<Vec<Room>>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message
    async fn create(&self, message: &Message) -> RepoResult<Message>;

    /// Find message by ID, with its current reaction count
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>>;

    /// Messages of a room, newest first, with reaction counts
    async fn find_by_room(&self, room_id: i64) -> RepoResult<Vec<Message>>;

    /// Conditionally mark a message answered.
    ///
    /// Returns `false` when the message was already answered; nothing is
    /// written in that case.
    async fn mark_answered(&self, id: Uuid, answer: &str) -> RepoResult<bool>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Add a reaction and return the message's resulting count.
    ///
    /// Fails with [`DomainError::ReactionAlreadyExists`] if the pair exists.
    async fn add(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<i64>;

    /// Remove a reaction and return the message's resulting count.
    ///
    /// Fails with [`DomainError::ReactionNotFound`] if the pair does not exist.
    async fn remove(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<i64>;

    /// Current reaction count of a message
    async fn count(&self, message_id: Uuid) -> RepoResult<i64>;

    /// IDs of the messages in a room the user has reacted to
    async fn message_ids_for_user(&self, room_id: i64, user_id: Uuid) -> RepoResult<Vec<Uuid>>;
}
