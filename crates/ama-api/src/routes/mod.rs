//! Route definitions
//!
//! REST routes mounted under /api, plus the health probes.

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::{health, messages, reactions, rooms};
use crate::state::AppState;

/// Create the main API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new().merge(room_routes()).merge(message_routes())
}

/// Room routes
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/:room_id", get(rooms::get_room))
        .route(
            "/rooms/:room_id/reactions",
            get(reactions::get_reacted_messages),
        )
}

/// Message, answer and reaction routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/rooms/:room_id/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route(
            "/rooms/:room_id/messages/:message_id",
            get(messages::get_message),
        )
        .route(
            "/rooms/:room_id/messages/:message_id/answer",
            patch(messages::answer_message),
        )
        .route(
            "/rooms/:room_id/messages/:message_id/react",
            patch(reactions::add_reaction).delete(reactions::remove_reaction),
        )
}
