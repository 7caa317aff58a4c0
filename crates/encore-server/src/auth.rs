// ABOUTME: The request authorization boundary: one extractor, one verification path.
// ABOUTME: Accepts an active session cookie or a bearer credential; both run through CredentialAuthority::verify.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use encore_core::credential::Claims;

use crate::app_state::SharedState;
use crate::error::ApiError;

/// Name of the cookie carrying the signed credential for browser sessions.
pub const SESSION_COOKIE: &str = "encore_session";

/// How the request authenticated: an active session cookie or an explicit
/// bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Session,
    Token,
}

/// A verified caller. Extracting this from a request is the authorization
/// decision: handlers that take an `AuthContext` cannot run unauthenticated,
/// and no upstream call happens before it succeeds.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
    pub method: AuthMethod,
}

impl FromRequestParts<SharedState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // An active session wins; a present-but-invalid cookie falls through
        // to the bearer path rather than failing the request outright.
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE)
            && let Ok(claims) = state.authority.verify(cookie.value())
        {
            return Ok(Self {
                claims,
                method: AuthMethod::Session,
            });
        }

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match bearer {
            Some(credential) => {
                let claims = state.authority.verify(credential)?;
                Ok(Self {
                    claims,
                    method: AuthMethod::Token,
                })
            }
            None => Err(ApiError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use encore_core::credential::CredentialAuthority;
    use http::header::COOKIE;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use tower::ServiceExt;

    use crate::app_state::{test_credential as credential, test_state};
    use crate::routes::create_router;

    #[tokio::test]
    async fn missing_credentials_return_401() {
        let state = test_state();
        let app = create_router(state);

        let resp = app
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_bearer_authenticates_as_token() {
        let state = test_state();
        let credential = credential(&state);
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::get("/auth/verify")
                    .header("authorization", format!("Bearer {}", credential))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["method"], "token");
    }

    #[tokio::test]
    async fn session_cookie_authenticates_as_session() {
        let state = test_state();
        let credential = credential(&state);
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::get("/auth/verify")
                    .header(COOKIE, format!("{}={}", SESSION_COOKIE, credential))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["method"], "session");
    }

    #[tokio::test]
    async fn expired_credential_is_rejected() {
        let state = test_state();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            access_token: "tok".to_string(),
            refresh_token: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )
        .unwrap();
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::get("/auth/verify")
                    .header("authorization", format!("Bearer {}", expired))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tampered_credential_is_rejected() {
        let state = test_state();
        let other = CredentialAuthority::new("attacker-secret")
            .issue("user-1", "tok", None)
            .unwrap();
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::get("/auth/verify")
                    .header("authorization", format!("Bearer {}", other))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_session_falls_through_to_valid_bearer() {
        let state = test_state();
        let credential = credential(&state);
        let app = create_router(state);

        let resp = app
            .oneshot(
                Request::get("/auth/verify")
                    .header(COOKIE, format!("{}=garbage", SESSION_COOKIE))
                    .header("authorization", format!("Bearer {}", credential))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["method"], "token");
    }
}
