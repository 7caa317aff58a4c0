// ABOUTME: Playback-control passthrough handlers.
// ABOUTME: Thin forwards to the upstream player endpoints on behalf of the verified caller.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::app_state::SharedState;
use crate::auth::AuthContext;
use crate::error::ApiError;

/// GET /api/player - Current playback state, passed through as-is.
/// `null` means no active playback device.
pub async fn state(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Value>, ApiError> {
    let playback = state.upstream(&ctx.claims).playback_state().await?;
    Ok(Json(playback))
}

/// PUT /api/player/play - Start or resume playback. The optional body
/// carries a context URI or track URIs in the upstream's own shape.
pub async fn play(
    State(state): State<SharedState>,
    ctx: AuthContext,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    state
        .upstream(&ctx.claims)
        .play(body.map(|Json(b)| b))
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// PUT /api/player/pause - Pause playback.
pub async fn pause(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Value>, ApiError> {
    state.upstream(&ctx.claims).pause().await?;
    Ok(Json(json!({ "ok": true })))
}

/// POST /api/player/next - Skip to the next track.
pub async fn next(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Value>, ApiError> {
    state.upstream(&ctx.claims).next_track().await?;
    Ok(Json(json!({ "ok": true })))
}

/// POST /api/player/previous - Skip to the previous track.
pub async fn previous(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Value>, ApiError> {
    state.upstream(&ctx.claims).previous_track().await?;
    Ok(Json(json!({ "ok": true })))
}
