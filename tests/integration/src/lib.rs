//! Integration test utilities for the AMA server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API and the real-time subscribe routes.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
