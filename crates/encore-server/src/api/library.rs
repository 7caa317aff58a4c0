// ABOUTME: Liked-songs passthrough handlers.
// ABOUTME: trackIds is validated at the boundary; a non-list never reaches upstream.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use encore_core::model::Track;

use crate::api::require_id_list;
use crate::app_state::SharedState;
use crate::auth::AuthContext;
use crate::error::ApiError;

/// GET /api/liked - The caller's liked songs.
pub async fn list(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<Vec<Track>>, ApiError> {
    let tracks = state.upstream(&ctx.claims).liked_tracks().await?;
    Ok(Json(tracks))
}

/// PUT /api/liked - Add tracks to liked songs.
pub async fn save(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let track_ids = require_id_list(&body, "trackIds")?;
    state.upstream(&ctx.claims).save_tracks(&track_ids).await?;
    Ok(Json(json!({ "ok": true, "saved": track_ids.len() })))
}

/// DELETE /api/liked - Remove tracks from liked songs.
pub async fn remove(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let track_ids = require_id_list(&body, "trackIds")?;
    state
        .upstream(&ctx.claims)
        .remove_saved_tracks(&track_ids)
        .await?;
    Ok(Json(json!({ "ok": true, "removed": track_ids.len() })))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::app_state::{test_credential, test_state};
    use crate::routes::create_router;

    async fn put_liked(body: &str) -> (StatusCode, serde_json::Value) {
        let state = test_state();
        let credential = test_credential(&state);
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::put("/api/liked")
                    .header("authorization", format!("Bearer {}", credential))
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn non_list_track_ids_is_rejected_before_upstream() {
        // The unroutable upstream URL would turn any forwarded call into a
        // 502; a 400 proves validation fired first.
        let (status, json) = put_liked(r#"{"trackIds": "t1"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "trackIds must be a list");
    }

    #[tokio::test]
    async fn absent_track_ids_is_rejected() {
        let (status, _) = put_liked(r#"{}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_track_ids_reach_upstream() {
        // Validation passes, so the request proceeds to the unroutable
        // upstream and surfaces as an upstream failure.
        let (status, json) = put_liked(r#"{"trackIds": ["t1", "t2"]}"#).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "upstream save tracks failed");
    }
}
