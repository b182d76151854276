//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.
//! Services publish events only after the repository call they follow has
//! succeeded.

pub mod context;
pub mod error;
pub mod message;
pub mod reaction;
pub mod room;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use reaction::ReactionService;
pub use room::RoomService;
