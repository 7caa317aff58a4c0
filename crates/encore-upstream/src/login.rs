// ABOUTME: Federated login completion against the upstream accounts service.
// ABOUTME: Builds the consent URL and exchanges the callback code for upstream tokens.

use serde::Deserialize;

use crate::error::UpstreamError;

/// Scopes requested during the consent step: profile, playlist read/write,
/// library read/write, playback state and control.
pub const SCOPES: &str = "user-read-email user-read-private \
    playlist-read-private playlist-modify-public playlist-modify-private \
    user-library-read user-library-modify \
    user-read-playback-state user-modify-playback-state streaming";

/// Upstream application credentials and endpoints for the login handshake.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Base URL of the upstream accounts service.
    pub accounts_url: String,
}

/// The tokens handed back at the end of the handshake. The expiry applies to
/// the upstream access token, not to any credential this application issues.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: u64,
}

impl LoginConfig {
    /// Build the consent URL the browser is redirected to. The `state` value
    /// is round-tripped via a short-lived cookie to tie the callback to the
    /// request that started it.
    pub fn authorize_url(&self, state: &str) -> String {
        let base = format!("{}/authorize", self.accounts_url);
        match reqwest::Url::parse_with_params(
            &base,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", SCOPES),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
            ],
        ) {
            Ok(url) => url.to_string(),
            // accounts_url is validated at startup; a parse failure here
            // means the config slipped through, so fall back to the bare base.
            Err(_) => base,
        }
    }

    /// Exchange the authorization code for upstream tokens. One POST to the
    /// accounts token endpoint with HTTP basic client credentials.
    pub async fn exchange_code(
        &self,
        http: &reqwest::Client,
        code: &str,
    ) -> Result<TokenGrant, UpstreamError> {
        let operation = "token exchange";
        let url = format!("{}/api/token", self.accounts_url);

        let response = http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                operation: operation.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| UpstreamError::Transport {
                operation: operation.to_string(),
                message: format!("failed to parse token response: {}", e),
            })
    }
}

/// Pull a human-readable message out of an upstream error body, falling back
/// to a bounded slice of the raw text.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        // Accounts service shape: {"error": "...", "error_description": "..."}
        if let Some(desc) = value.get("error_description").and_then(|d| d.as_str()) {
            return desc.to_string();
        }
        // Web API shape: {"error": {"status": ..., "message": "..."}}
        if let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
        if let Some(msg) = value.get("error").and_then(|e| e.as_str()) {
            return msg.to_string();
        }
    }

    let mut message: String = body.chars().take(200).collect();
    if message.is_empty() {
        message = "no error body".to_string();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(accounts_url: &str) -> LoginConfig {
        LoginConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:8888/auth/callback".to_string(),
            accounts_url: accounts_url.to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_required_params() {
        let url = config("https://accounts.example.com").authorize_url("csrf-state-1");

        assert!(url.starts_with("https://accounts.example.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("state=csrf-state-1"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8888%2Fauth%2Fcallback"));
    }

    #[test]
    fn extract_error_message_handles_both_shapes() {
        assert_eq!(
            extract_error_message(r#"{"error": "invalid_grant", "error_description": "Code expired"}"#),
            "Code expired"
        );
        assert_eq!(
            extract_error_message(r#"{"error": {"status": 401, "message": "Token revoked"}}"#),
            "Token revoked"
        );
        assert_eq!(extract_error_message(r#"{"error": "plain"}"#), "plain");
        assert_eq!(extract_error_message("not json"), "not json");
        assert_eq!(extract_error_message(""), "no error body");
    }

    #[tokio::test]
    async fn exchange_code_round_trips_against_stub() {
        use axum::routing::post;

        let app = axum::Router::new().route(
            "/api/token",
            post(|| async {
                axum::Json(serde_json::json!({
                    "access_token": "upstream-access",
                    "refresh_token": "upstream-refresh",
                    "expires_in": 3600
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let grant = config(&format!("http://{}", addr))
            .exchange_code(&reqwest::Client::new(), "auth-code")
            .await
            .unwrap();

        assert_eq!(grant.access_token, "upstream-access");
        assert_eq!(grant.refresh_token.as_deref(), Some("upstream-refresh"));
        assert_eq!(grant.expires_in, 3600);
    }

    #[tokio::test]
    async fn exchange_code_surfaces_upstream_rejection() {
        use axum::http::StatusCode;
        use axum::routing::post;

        let app = axum::Router::new().route(
            "/api/token",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    axum::Json(serde_json::json!({
                        "error": "invalid_grant",
                        "error_description": "Invalid authorization code"
                    })),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let err = config(&format!("http://{}", addr))
            .exchange_code(&reqwest::Client::new(), "bad-code")
            .await
            .unwrap_err();

        match err {
            UpstreamError::Api { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid authorization code");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
