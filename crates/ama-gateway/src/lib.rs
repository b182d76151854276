//! # ama-gateway
//!
//! Real-time hub: WebSocket subscriptions per room and for the global room
//! list, fed by the events services publish after each committed mutation.
//!
//! ## Overview
//!
//! - [`connection`]: the registry of live subscribers per scope
//! - [`broadcast`]: the dispatcher that fans events out in publish order
//! - [`hub`]: registry, dispatcher and shutdown coordination
//! - [`server`]: subscribe routes and the per-connection lifecycle

pub mod broadcast;
pub mod connection;
pub mod hub;
pub mod protocol;
pub mod server;

pub use broadcast::{DeliveryReport, EventDispatcher};
pub use connection::{ConnectionRegistry, Subscriber, Subscription};
pub use hub::Hub;
pub use protocol::CloseCode;
pub use server::{routes, GatewayError, GatewayState, OriginPolicy};
