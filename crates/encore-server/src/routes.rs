// ABOUTME: Route definitions for the encore HTTP API.
// ABOUTME: Assembles auth, passthrough, and generation routes into a single Axum Router with shared state.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", get(api::auth::login))
        .route("/auth/callback", get(api::auth::callback))
        .route("/auth/verify", get(api::auth::verify))
        .route("/auth/logout", post(api::auth::logout))
        .route("/api/me", get(api::profile::me))
        .route(
            "/api/playlists",
            get(api::playlists::list).post(api::playlists::create),
        )
        .route("/api/playlists/generate", post(api::generate::generate))
        .route(
            "/api/playlists/{id}",
            put(api::playlists::rename).delete(api::playlists::unfollow),
        )
        .route(
            "/api/playlists/{id}/tracks",
            get(api::playlists::tracks)
                .post(api::playlists::add_tracks)
                .delete(api::playlists::remove_tracks),
        )
        .route(
            "/api/liked",
            get(api::library::list)
                .put(api::library::save)
                .delete(api::library::remove),
        )
        .route("/api/search", get(api::search::search))
        .route("/api/player", get(api::player::state))
        .route("/api/player/play", put(api::player::play))
        .route("/api/player/pause", put(api::player::pause))
        .route("/api/player/next", post(api::player::next))
        .route("/api/player/previous", post(api::player::previous))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
