// ABOUTME: Configuration loading and validation for the encore server.
// ABOUTME: Reads environment variables and enforces startup-fatal constraints.

use std::net::SocketAddr;

use thiserror::Error;

use encore_upstream::LoginConfig;

/// Errors that can occur during configuration loading. All of these are
/// fatal at startup, never per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ENCORE_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("ENCORE_SIGNING_SECRET is not set; refusing to start without a credential signing key")]
    MissingSigningSecret,

    #[error("UPSTREAM_CLIENT_ID and UPSTREAM_CLIENT_SECRET must both be set for the login handshake")]
    MissingUpstreamCredentials,

    #[error("failed to build the HTTP client: {0}")]
    HttpClient(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EncoreConfig {
    pub bind: SocketAddr,
    pub signing_secret: String,
    pub frontend_url: String,
    pub upstream_api_url: String,
    pub login: LoginConfig,
    pub generative_provider: String,
    pub generative_model: Option<String>,
}

impl EncoreConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - ENCORE_BIND: socket address to bind (default: 127.0.0.1:8888)
    /// - ENCORE_SIGNING_SECRET: credential signing secret (required)
    /// - ENCORE_FRONTEND_URL: where the browser is sent after login (default: http://localhost:3000)
    /// - ENCORE_UPSTREAM_API_URL: upstream Web API base (default: https://api.spotify.com/v1)
    /// - ENCORE_UPSTREAM_ACCOUNTS_URL: upstream accounts base (default: https://accounts.spotify.com)
    /// - UPSTREAM_CLIENT_ID / UPSTREAM_CLIENT_SECRET: application credentials (required)
    /// - ENCORE_REDIRECT_URI: login callback URL (default: http://<bind>/auth/callback)
    /// - ENCORE_GENERATIVE_PROVIDER: generative-text provider (default: anthropic)
    /// - ENCORE_GENERATIVE_MODEL: model override (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_str =
            std::env::var("ENCORE_BIND").unwrap_or_else(|_| "127.0.0.1:8888".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let signing_secret = std::env::var("ENCORE_SIGNING_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSigningSecret)?;

        let frontend_url = std::env::var("ENCORE_FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let upstream_api_url = std::env::var("ENCORE_UPSTREAM_API_URL")
            .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string());
        let accounts_url = std::env::var("ENCORE_UPSTREAM_ACCOUNTS_URL")
            .unwrap_or_else(|_| "https://accounts.spotify.com".to_string());

        let client_id = std::env::var("UPSTREAM_CLIENT_ID").ok().filter(|v| !v.is_empty());
        let client_secret = std::env::var("UPSTREAM_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty());
        let (client_id, client_secret) = match (client_id, client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(ConfigError::MissingUpstreamCredentials),
        };

        let redirect_uri = std::env::var("ENCORE_REDIRECT_URI")
            .unwrap_or_else(|_| format!("http://{}/auth/callback", bind));

        let generative_provider = std::env::var("ENCORE_GENERATIVE_PROVIDER")
            .unwrap_or_else(|_| "anthropic".to_string());
        let generative_model = std::env::var("ENCORE_GENERATIVE_MODEL")
            .ok()
            .filter(|m| !m.is_empty());

        Ok(Self {
            bind,
            signing_secret,
            frontend_url,
            upstream_api_url,
            login: LoginConfig {
                client_id,
                client_secret,
                redirect_uri,
                accounts_url,
            },
            generative_provider,
            generative_model,
        })
    }
}
