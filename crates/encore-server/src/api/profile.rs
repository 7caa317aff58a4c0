// ABOUTME: Profile passthrough handler.
// ABOUTME: One upstream call on behalf of the verified caller, reshaped to the application contract.

use axum::Json;
use axum::extract::State;

use encore_core::model::UserProfile;

use crate::app_state::SharedState;
use crate::auth::AuthContext;
use crate::error::ApiError;

/// GET /api/me - The caller's profile.
pub async fn me(
    State(state): State<SharedState>,
    ctx: AuthContext,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.upstream(&ctx.claims).profile().await?;
    Ok(Json(profile))
}
