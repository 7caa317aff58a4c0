// ABOUTME: HTTP server for encore, fronting the upstream music API behind its own credential layer.
// ABOUTME: Uses Axum with shared immutable state; every protected route goes through one AuthContext extractor.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::EncoreConfig;
pub use routes::create_router;
