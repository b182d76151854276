//! Service context - dependency container for services
//!
//! Holds the repositories, the event publisher and the optional database pool
//! needed by services.

use std::sync::Arc;

use ama_core::traits::{EventPublisher, MessageRepository, ReactionRepository, RoomRepository};
use ama_db::{MemoryStore, PgMessageRepository, PgPool, PgReactionRepository, PgRoomRepository};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Storage repositories (PostgreSQL or in-memory)
/// - The publisher that fans committed events out to subscribers
/// - The database pool, when one backs the repositories
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool, absent for the in-memory backend
    pool: Option<PgPool>,

    // Repositories
    room_repo: Arc<dyn RoomRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    // Events
    publisher: Arc<dyn EventPublisher>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: Option<PgPool>,
        room_repo: Arc<dyn RoomRepository>,
        message_repo: Arc<dyn MessageRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            pool,
            room_repo,
            message_repo,
            reaction_repo,
            publisher,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if storage is PostgreSQL-backed
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    /// Get the room repository
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Events ===

    /// Get the event publisher
    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("publisher", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            room_repo: None,
            message_repo: None,
            reaction_repo: None,
            publisher: None,
        }
    }

    /// Use PostgreSQL repositories over the given pool
    pub fn postgres(mut self, pool: PgPool) -> Self {
        self.room_repo = Some(Arc::new(PgRoomRepository::new(pool.clone())));
        self.message_repo = Some(Arc::new(PgMessageRepository::new(pool.clone())));
        self.reaction_repo = Some(Arc::new(PgReactionRepository::new(pool.clone())));
        self.pool = Some(pool);
        self
    }

    /// Use one in-memory store for every repository
    pub fn memory(mut self, store: Arc<MemoryStore>) -> Self {
        self.room_repo = Some(store.clone());
        self.message_repo = Some(store.clone());
        self.reaction_repo = Some(store);
        self
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool,
            self.room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            self.publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
