//! HTTP API for the primary service.

pub mod routes;
pub mod tasks;

pub use routes::{serve, AppState};
