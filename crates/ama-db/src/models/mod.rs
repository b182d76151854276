//! Database models - SQLx-compatible structs for PostgreSQL tables

mod message;
mod room;

pub use message::MessageModel;
pub use room::RoomModel;
