//! Domain entities - core business objects

mod message;
mod reaction;
mod room;

pub use message::Message;
pub use reaction::Reaction;
pub use room::{NewRoom, Room, MAX_ROOM_DESCRIPTION_LEN};
