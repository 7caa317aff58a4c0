// ABOUTME: Error type for upstream API calls.
// ABOUTME: Every failure carries the operation name so callers can report which passthrough broke.

use thiserror::Error;

/// Errors produced by upstream API calls. Each attempt is exactly one
/// attempt: nothing here is retried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream API answered with a non-success status.
    #[error("upstream {operation} failed ({status}): {message}")]
    Api {
        operation: String,
        status: u16,
        message: String,
    },

    /// The request never completed: connection failure, timeout, or an
    /// unreadable response body.
    #[error("upstream {operation} transport failure: {message}")]
    Transport { operation: String, message: String },
}

impl UpstreamError {
    /// The passthrough operation that failed.
    pub fn operation(&self) -> &str {
        match self {
            UpstreamError::Api { operation, .. } => operation,
            UpstreamError::Transport { operation, .. } => operation,
        }
    }

    /// The upstream-provided (or transport) failure message.
    pub fn message(&self) -> &str {
        match self {
            UpstreamError::Api { message, .. } => message,
            UpstreamError::Transport { message, .. } => message,
        }
    }
}
