//! Individual subscriber connection
//!
//! Represents a single WebSocket subscription and its state.

use crate::protocol::{CloseCode, Frame};
use ama_core::EventScope;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// Process-unique connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgraded, not yet registered
    Connecting,
    /// Registered under its scope and receiving frames
    Subscribed,
    /// Unwinding its tasks
    Closing,
    /// Unregistered
    Closed,
}

/// Handle the hub uses to push frames to one connection.
///
/// Cloning is cheap; the socket itself is owned by the connection's tasks.
#[derive(Clone)]
pub struct Subscriber {
    id: ConnectionId,
    sender: mpsc::Sender<Frame>,
    token: CancellationToken,
    evicted: Arc<AtomicBool>,
}

impl Subscriber {
    /// Create a subscriber from the connection's outbound channel and token
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Frame>, token: CancellationToken) -> Self {
        Self {
            id,
            sender,
            token,
            evicted: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame without waiting
    pub fn try_send(&self, frame: Frame) -> Result<(), TrySendError<Frame>> {
        self.sender.try_send(frame)
    }

    /// Mark the connection as a slow consumer and cancel it
    pub fn evict(&self) {
        self.evicted.store(true, Ordering::SeqCst);
        self.token.cancel();
    }

    /// Check if the hub evicted this connection
    pub fn is_evicted(&self) -> bool {
        self.evicted.load(Ordering::SeqCst)
    }

    /// Check if the connection has been cancelled for any reason
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Close code for a connection whose send loop has ended
    pub fn close_code(&self, shutting_down: bool) -> CloseCode {
        if shutting_down {
            CloseCode::GoingAway
        } else if self.is_evicted() {
            CloseCode::SlowConsumer
        } else {
            CloseCode::Normal
        }
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("evicted", &self.is_evicted())
            .finish_non_exhaustive()
    }
}

/// Tracks one connection through its states, logging every transition
#[derive(Debug)]
pub struct Lifecycle {
    id: ConnectionId,
    scope: EventScope,
    state: ConnectionState,
}

impl Lifecycle {
    pub fn new(id: ConnectionId, scope: EventScope) -> Self {
        tracing::debug!(connection_id = %id, scope = %scope, "Connection connecting");
        Self {
            id,
            scope,
            state: ConnectionState::Connecting,
        }
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Move to the next state
    pub fn advance(&mut self, next: ConnectionState) {
        tracing::debug!(
            connection_id = %self.id,
            scope = %self.scope,
            from = ?self.state,
            to = ?next,
            "Connection state changed"
        );
        self.state = next;
    }
}
