//! # ama-db
//!
//! Storage layer implementing the repository traits of `ama-core`.
//!
//! ## Overview
//!
//! - Connection pool management and SQL migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repository implementations
//! - An in-memory store with the same semantics
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ama_db::pool::{create_pool, default_migrations_dir, run_migrations, PoolConfig};
//! use ama_db::repositories::PgRoomRepository;
//! use ama_core::traits::RoomRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::default()).await?;
//!     run_migrations(&pool, default_migrations_dir()).await?;
//!     let rooms = PgRoomRepository::new(pool).list().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, default_migrations_dir, run_migrations, PgPool, PoolConfig};
pub use repositories::{PgMessageRepository, PgReactionRepository, PgRoomRepository};
