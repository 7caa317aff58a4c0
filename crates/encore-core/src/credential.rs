// ABOUTME: Issues and verifies the signed bearer credential handed out after federated login.
// ABOUTME: One CredentialAuthority, one verify path; every caller-trusted decode goes through it.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an issued credential stays valid.
pub const CREDENTIAL_TTL_DAYS: i64 = 7;

/// Errors produced by credential issuance and verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity must be non-empty")]
    EmptyIdentity,

    #[error("credential has expired")]
    Expired,

    #[error("credential signature is invalid")]
    InvalidSignature,

    #[error("credential is malformed: {0}")]
    Malformed(String),
}

/// The payload carried inside every issued credential.
///
/// The upstream tokens ride inside the signed payload so that each request
/// can reconstruct its upstream session without any server-side store. The
/// structure is closed: unknown or missing required fields fail verification
/// rather than being tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity (the upstream account id resolved at login).
    pub sub: String,
    /// Upstream access token, presented as a bearer on every upstream call.
    pub access_token: String,
    /// Upstream refresh token. Carried but never exercised; upstream token
    /// refresh is out of scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expires-at, unix seconds.
    pub exp: i64,
}

/// Signs and verifies credentials with a single HS256 secret.
///
/// Construct once at startup from configuration and share via application
/// state. There is deliberately no decode-without-verify operation: any code
/// that wants the upstream tokens out of a credential must pass the same
/// signature and expiry checks as the authorization gate.
#[derive(Clone)]
pub struct CredentialAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CredentialAuthority {
    /// Create an authority from the shared signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed credential binding the caller identity to its upstream
    /// tokens, valid for [`CREDENTIAL_TTL_DAYS`] from now.
    pub fn issue(
        &self,
        identity: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<String, AuthError> {
        if identity.trim().is_empty() {
            return Err(AuthError::EmptyIdentity);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: identity.to_string(),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(String::from),
            iat: now.timestamp(),
            exp: (now + Duration::days(CREDENTIAL_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Malformed(e.to_string()))
    }

    /// Verify a credential's signature and expiry and return its claims.
    ///
    /// This is the only path from an untrusted credential string to trusted
    /// claims. Expiry is checked with zero leeway: an expired-but-correctly-
    /// signed credential is rejected, as is a well-formed-but-tampered one.
    pub fn verify(&self, credential: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(credential, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::Malformed("empty subject".to_string()));
        }

        Ok(data.claims)
    }
}
