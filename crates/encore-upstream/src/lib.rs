// ABOUTME: Client library for the upstream music-streaming provider's Web API.
// ABOUTME: Completes the federated login handshake and issues passthrough calls on behalf of a verified caller.

pub mod client;
pub mod error;
pub mod login;
pub mod reshape;

pub use client::{UPSTREAM_TIMEOUT_SECS, UpstreamClient};
pub use error::UpstreamError;
pub use login::{LoginConfig, TokenGrant};
