//! Ports implemented by the infrastructure crates

mod publisher;
mod repositories;

pub use publisher::{EventPublisher, NoopPublisher};
pub use repositories::{MessageRepository, ReactionRepository, RepoResult, RoomRepository};
