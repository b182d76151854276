//! Subscribe endpoints
//!
//! Routes, state, and upgrade handling for the real-time hub.

mod error;
mod handler;
mod origin;
mod state;

pub use error::GatewayError;
pub use handler::{subscribe_global, subscribe_room};
pub use origin::OriginPolicy;
pub use state::GatewayState;

use axum::extract::FromRef;
use axum::{routing::get, Router};

/// Subscribe routes, mountable on any router whose state provides `GatewayState`
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    GatewayState: FromRef<S>,
{
    Router::new()
        .route("/subscribe", get(subscribe_global))
        .route("/subscribe/", get(subscribe_global))
        .route("/subscribe/room/:room_id", get(subscribe_room))
}

/// Standalone router over `GatewayState`
pub fn create_router(state: GatewayState) -> Router {
    routes::<GatewayState>().with_state(state)
}
