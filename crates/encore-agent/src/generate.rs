// ABOUTME: Defines the TextGenerator trait that all generative-text provider adapters implement.
// ABOUTME: Also defines GenerateError, the taxonomy of generative-call failures.

use async_trait::async_trait;

/// Errors that can occur during a generative-text call.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configured provider has no API key. Fatal for the request that
    /// needed it, not for the process.
    #[error("generative provider not configured: {0}")]
    NotConfigured(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Trait all generative-text provider adapters implement. Each provider
/// translates one natural-language instruction into one API call and returns
/// the model's raw text; everything downstream (parsing, recovery) is
/// provider-independent.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one generative request and return the raw response text.
    async fn generate(&self, instruction: &str) -> Result<String, GenerateError>;

    /// Provider name for logging (e.g. "anthropic", "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier being used.
    fn model_name(&self) -> &str;
}
