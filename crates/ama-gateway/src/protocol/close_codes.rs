//! WebSocket close codes
//!
//! Close codes the hub sends when it ends a subscription.

/// Hub WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// Subscription ended normally (client went away or closed)
    Normal = 1000,
    /// Server is shutting down
    GoingAway = 1001,
    /// Outbound buffer overflowed; the subscriber was evicted
    SlowConsumer = 4008,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Reason text carried in the close frame
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "Subscription closed",
            Self::GoingAway => "Server shutting down",
            Self::SlowConsumer => "Slow consumer",
        }
    }
}
