//! Hub protocol definitions
//!
//! The hub only pushes server-to-client frames; a frame is the JSON text of
//! one room event, shared by every subscriber it is written to.

mod close_codes;

use std::sync::Arc;

pub use close_codes::CloseCode;

/// One serialized event, cloned cheaply into every outbound buffer
pub type Frame = Arc<str>;
