// ABOUTME: Shared application state for the encore HTTP server.
// ABOUTME: Immutable after startup; upstream sessions are rebuilt from verified claims per request.

use std::sync::Arc;
use std::time::Duration;

use encore_core::credential::{Claims, CredentialAuthority};
use encore_upstream::{LoginConfig, UPSTREAM_TIMEOUT_SECS, UpstreamClient};

use crate::config::{ConfigError, EncoreConfig};

/// Shared application state accessible by all Axum handlers. Holds no
/// per-caller data: upstream sessions are constructed from each request's
/// verified credential and dropped with the request.
pub struct AppState {
    pub authority: CredentialAuthority,
    pub http: reqwest::Client,
    pub upstream_api_url: String,
    pub login: LoginConfig,
    pub frontend_url: String,
    pub generative_provider: String,
    pub generative_model: Option<String>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state from validated configuration. The single reqwest client
    /// carries the bounded per-call timeout and is cloned into each
    /// per-request upstream session.
    pub fn from_config(config: &EncoreConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            authority: CredentialAuthority::new(&config.signing_secret),
            http,
            upstream_api_url: config.upstream_api_url.clone(),
            login: config.login.clone(),
            frontend_url: config.frontend_url.clone(),
            generative_provider: config.generative_provider.clone(),
            generative_model: config.generative_model.clone(),
        })
    }

    /// Construct the per-request upstream session for a verified caller.
    pub fn upstream(&self, claims: &Claims) -> UpstreamClient {
        UpstreamClient::from_claims(self.http.clone(), self.upstream_api_url.clone(), claims)
    }
}

/// Shared state for handler tests. The upstream and accounts URLs are
/// unroutable so any accidental upstream call fails loudly.
#[cfg(test)]
pub(crate) fn test_state() -> SharedState {
    Arc::new(AppState {
        authority: CredentialAuthority::new("test-signing-secret"),
        http: reqwest::Client::new(),
        upstream_api_url: "http://127.0.0.1:1".to_string(),
        login: LoginConfig {
            client_id: "cid".to_string(),
            client_secret: "csecret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/auth/callback".to_string(),
            accounts_url: "http://127.0.0.1:1".to_string(),
        },
        frontend_url: "http://localhost:3000".to_string(),
        generative_provider: "anthropic".to_string(),
        generative_model: None,
    })
}

/// Issue a valid credential against the test state's authority.
#[cfg(test)]
pub(crate) fn test_credential(state: &SharedState) -> String {
    state
        .authority
        .issue("user-1", "upstream-access", None)
        .unwrap()
}
