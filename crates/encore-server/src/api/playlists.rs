// ABOUTME: Playlist CRUD passthrough handlers.
// ABOUTME: Visibility defaults to private on create; repeated creates duplicate, which is upstream behavior.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::{Value, json};

use encore_core::model::{PlaylistSummary, Track};

use crate::api::require_id_list;
use crate::app_state::SharedState;
use crate::auth::AuthContext;
use crate::error::ApiError;

/// Request body for creating a playlist.
#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub public: Option<bool>,
}

/// Request body for renaming a playlist.
#[derive(Debug, Deserialize)]
pub struct RenamePlaylistRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /api/playlists - The caller's playlists.
pub async fn list(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Vec<PlaylistSummary>>, ApiError> {
    let playlists = state.upstream(&ctx.claims).playlists().await?;
    Ok(Json(playlists))
}

/// POST /api/playlists - Create a playlist for the caller.
pub async fn create(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<Json<PlaylistSummary>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }

    let playlist = state
        .upstream(&ctx.claims)
        .create_playlist(
            &ctx.claims.sub,
            name,
            req.description.as_deref(),
            req.public.unwrap_or(false),
        )
        .await?;
    Ok(Json(playlist))
}

/// PUT /api/playlists/{id} - Rename a playlist.
pub async fn rename(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<RenamePlaylistRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }

    state.upstream(&ctx.claims).rename_playlist(&id, name).await?;
    Ok(Json(json!({ "ok": true })))
}

/// DELETE /api/playlists/{id} - Stop following a playlist.
pub async fn unfollow(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.upstream(&ctx.claims).unfollow_playlist(&id).await?;
    Ok(Json(json!({ "ok": true })))
}

/// GET /api/playlists/{id}/tracks - The tracks of one playlist, in order.
pub async fn tracks(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let tracks = state.upstream(&ctx.claims).playlist_tracks(&id).await?;
    Ok(Json(tracks))
}

/// POST /api/playlists/{id}/tracks - Add tracks by URI.
pub async fn add_tracks(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let uris = require_id_list(&body, "uris")?;
    state.upstream(&ctx.claims).add_tracks(&id, &uris).await?;
    Ok(Json(json!({ "ok": true, "added": uris.len() })))
}

/// DELETE /api/playlists/{id}/tracks - Remove tracks by URI.
pub async fn remove_tracks(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let uris = require_id_list(&body, "uris")?;
    state.upstream(&ctx.claims).remove_tracks(&id, &uris).await?;
    Ok(Json(json!({ "ok": true, "removed": uris.len() })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::app_state::{test_credential, test_state};
    use crate::routes::create_router;

    #[tokio::test]
    async fn create_rejects_missing_name() {
        let state = test_state();
        let credential = test_credential(&state);
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::post("/api/playlists")
                    .header("authorization", format!("Bearer {}", credential))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "name is required");
    }

    #[tokio::test]
    async fn add_tracks_rejects_non_list_uris() {
        let state = test_state();
        let credential = test_credential(&state);
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::post("/api/playlists/p1/tracks")
                    .header("authorization", format!("Bearer {}", credential))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"uris": "upstream:track:t1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mutations_require_authentication() {
        let app = create_router(test_state());

        let resp = app
            .oneshot(
                Request::post("/api/playlists")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name": "New"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
