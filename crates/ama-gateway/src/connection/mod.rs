//! Connection management
//!
//! Tracks subscriber connections and the scopes they listen on.

mod connection;
mod registry;

pub use connection::{ConnectionId, ConnectionState, Lifecycle, Subscriber};
pub use registry::{ConnectionRegistry, Subscription};
