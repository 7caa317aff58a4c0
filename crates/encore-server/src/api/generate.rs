// ABOUTME: AI playlist generation handler.
// ABOUTME: Validates the prompt, builds the configured generator, and runs the candidate pipeline.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use encore_agent::playlist::DEFAULT_SONG_COUNT;
use encore_agent::{GenerateError, create_generator, generate_playlist};
use encore_core::model::GeneratedPlaylist;

use crate::app_state::SharedState;
use crate::auth::AuthContext;
use crate::error::ApiError;

/// Upper bound on one generated playlist.
const MAX_SONG_COUNT: usize = 50;

/// Request body for POST /api/playlists/generate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    pub song_count: Option<usize>,
}

/// POST /api/playlists/generate - Generate a playlist from a free-text prompt.
pub async fn generate(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratedPlaylist>, ApiError> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::Validation("prompt is required".to_string()));
    }
    let song_count = req
        .song_count
        .unwrap_or(DEFAULT_SONG_COUNT)
        .clamp(1, MAX_SONG_COUNT);

    let generator = create_generator(
        &state.generative_provider,
        state.generative_model.as_deref(),
    )
    .map_err(|e| match e {
        GenerateError::NotConfigured(msg) => ApiError::GenerativeNotConfigured(msg),
        other => ApiError::Generative(other.to_string()),
    })?;

    let upstream = state.upstream(&ctx.claims);
    let playlist = generate_playlist(generator.as_ref(), &upstream, prompt, song_count).await?;

    tracing::info!(
        identity = %ctx.claims.sub,
        requested = song_count,
        resolved = playlist.tracks.len(),
        "generated playlist"
    );
    Ok(Json(playlist))
}
