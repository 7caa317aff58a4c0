// ABOUTME: The server's error taxonomy and its mapping to HTTP responses.
// ABOUTME: Every failure resolves to a structured {error, details?} JSON body; nothing propagates unhandled.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use encore_agent::{GenerateError, PlaylistError};
use encore_core::credential::AuthError;
use encore_upstream::UpstreamError;

/// All the ways a request can fail, ordered roughly by where they are
/// detected: authorization and validation at the boundary, everything else
/// at the upstream or generative call site.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("only {found} of {requested} requested songs could be matched")]
    Insufficient { found: usize, requested: usize },

    #[error("generative response was not a parseable candidate list")]
    Unparseable { excerpt: String },

    #[error("generative provider not configured: {0}")]
    GenerativeNotConfigured(String),

    #[error("generative call failed: {0}")]
    Generative(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        // The specific rejection reason is logged, never echoed to the
        // caller.
        tracing::debug!(reason = %e, "credential rejected");
        ApiError::Unauthorized
    }
}

impl From<PlaylistError> for ApiError {
    fn from(e: PlaylistError) -> Self {
        match e {
            PlaylistError::Unparseable { excerpt } => ApiError::Unparseable { excerpt },
            PlaylistError::Insufficient { found, requested } => {
                ApiError::Insufficient { found, requested }
            }
            PlaylistError::Generate(GenerateError::NotConfigured(msg)) => {
                ApiError::GenerativeNotConfigured(msg)
            }
            PlaylistError::Generate(other) => ApiError::Generative(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "unauthorized" }),
            ),
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Insufficient { found, requested } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "not enough matching songs were found",
                    "details": { "found": found, "requested": requested }
                }),
            ),
            ApiError::Unparseable { excerpt } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "generative response was not a parseable candidate list",
                    "details": { "excerpt": excerpt }
                }),
            ),
            ApiError::GenerativeNotConfigured(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("generative provider not configured: {}", message) }),
            ),
            ApiError::Generative(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("generative call failed: {}", message) }),
            ),
            ApiError::Upstream(e) => {
                tracing::error!(operation = e.operation(), error = %e, "upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({
                        "error": format!("upstream {} failed", e.operation()),
                        "details": e.message()
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
