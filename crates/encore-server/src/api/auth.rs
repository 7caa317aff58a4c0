// ABOUTME: Login handshake, credential verification, and logout handlers.
// ABOUTME: The callback is the issuance endpoint: it is the only place a credential is minted.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use serde_json::{Value, json};
use time::Duration;

use crate::app_state::SharedState;
use crate::auth::{AuthContext, SESSION_COOKIE};

/// Short-lived cookie tying the callback to the browser that started login.
const STATE_COOKIE: &str = "encore_auth_state";

/// GET /auth/login - Start the federated login handshake.
///
/// Redirects the browser to the upstream consent page with a fresh CSRF
/// state value, round-tripped via a short-lived cookie.
pub async fn login(State(state): State<SharedState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let csrf_state: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();

    let cookie = Cookie::build((STATE_COOKIE, csrf_state.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/auth")
        .max_age(Duration::minutes(5))
        .build();

    let url = state.login.authorize_url(&csrf_state);
    (jar.add(cookie), Redirect::temporary(&url))
}

/// Query parameters the upstream accounts service sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /auth/callback - Complete the handshake and issue the credential.
///
/// Exchanges the authorization code, resolves the caller identity from the
/// upstream profile, mints the signed credential, sets it as the session
/// cookie, and sends the browser back to the front end with the credential
/// attached as a URL parameter. Any failure sends the browser back with an
/// error marker instead; nothing is issued.
pub async fn callback(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> (CookieJar, Redirect) {
    let sent_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(Cookie::build((STATE_COOKIE, "")).path("/auth").build());
    let failed = |jar: CookieJar, reason: &str| {
        tracing::warn!(reason, "login handshake failed");
        let url = format!("{}/?error=login_failed", state.frontend_url);
        (jar, Redirect::temporary(&url))
    };

    if let Some(error) = params.error {
        return failed(jar, &format!("upstream consent denied: {}", error));
    }
    let Some(code) = params.code else {
        return failed(jar, "callback missing authorization code");
    };

    // CSRF check before any side effect: the state we sent must come back
    // unchanged.
    if sent_state.as_deref() != params.state.as_deref() || sent_state.is_none() {
        return failed(jar, "state mismatch on callback");
    }

    let grant = match state.login.exchange_code(&state.http, &code).await {
        Ok(grant) => grant,
        Err(e) => return failed(jar, &e.to_string()),
    };

    // Resolve the caller identity with the freshly granted access token.
    let upstream = encore_upstream::UpstreamClient::new(
        state.http.clone(),
        state.upstream_api_url.clone(),
        grant.access_token.clone(),
    );
    let profile = match upstream.profile().await {
        Ok(profile) => profile,
        Err(e) => return failed(jar, &e.to_string()),
    };

    let credential = match state.authority.issue(
        &profile.id,
        &grant.access_token,
        grant.refresh_token.as_deref(),
    ) {
        Ok(credential) => credential,
        Err(e) => return failed(jar, &e.to_string()),
    };

    let session = Cookie::build((SESSION_COOKIE, credential.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(7))
        .build();

    tracing::info!(identity = %profile.id, "login complete, credential issued");
    let url = format!("{}/?token={}", state.frontend_url, credential);
    (jar.add(session), Redirect::temporary(&url))
}

/// GET /auth/verify - Report whether the request is authenticated and how.
///
/// The extractor is the whole check; the body never echoes token contents.
pub async fn verify(ctx: AuthContext) -> Json<Value> {
    Json(json!({ "ok": true, "method": ctx.method }))
}

/// POST /auth/logout - Invalidate the session side.
///
/// Bearer credentials are stateless and cannot be revoked server-side; the
/// cookie is the only thing there is to clear.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Json(json!({ "ok": true })))
}
