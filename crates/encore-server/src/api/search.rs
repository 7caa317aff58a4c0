// ABOUTME: Catalog search handler.
// ABOUTME: Blank queries short-circuit to the stable empty shape without touching upstream.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use encore_core::model::SearchResults;

use crate::app_state::SharedState;
use crate::auth::AuthContext;
use crate::error::ApiError;

/// Query parameters for GET /api/search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub types: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/search - Search the upstream catalog.
pub async fn search(
    State(state): State<SharedState>,
    ctx: AuthContext,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let results = state
        .upstream(&ctx.claims)
        .search(&params.q, params.types.as_deref(), params.limit)
        .await?;
    Ok(Json(results))
}
