//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in ama-core.

mod error;
mod message;
mod reaction;
mod room;

pub use error::{map_constraint_violation, map_db_error};
pub use message::PgMessageRepository;
pub use reaction::PgReactionRepository;
pub use room::PgRoomRepository;
