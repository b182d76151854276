//! # ama-api
//!
//! HTTP server for live AMA events built with the Axum framework.
//!
//! Serves the REST endpoints for rooms, questions, answers and reactions,
//! and mounts the real-time subscribe routes of `ama-gateway` on the same
//! listener.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, serve};
pub use state::AppState;
