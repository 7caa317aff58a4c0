// ABOUTME: Provider module aggregating the generative-text adapters.
// ABOUTME: Each sub-module implements TextGenerator for a specific API; the factory picks one by name.

pub mod anthropic;
pub mod openai;

use std::sync::Arc;

use crate::generate::{GenerateError, TextGenerator};

pub use anthropic::AnthropicGenerator;
pub use openai::OpenAiGenerator;

/// Read an env var and return `Some(value)` only if it is non-empty after
/// trimming, so blank values never produce invalid URLs or model names.
pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

/// Create a generator for the given provider name.
///
/// The model is resolved from the explicit `model` parameter, then a
/// provider-specific environment variable, then the provider default. A
/// missing API key is `GenerateError::NotConfigured`: the request that needed
/// the generator fails, the process keeps serving.
pub fn create_generator(
    provider: &str,
    model: Option<&str>,
) -> Result<Arc<dyn TextGenerator>, GenerateError> {
    match provider {
        "anthropic" => Ok(Arc::new(AnthropicGenerator::from_env(model)?)),
        "openai" => Ok(Arc::new(OpenAiGenerator::from_env(model)?)),
        unknown => Err(GenerateError::NotConfigured(format!(
            "unsupported generative provider: {}",
            unknown
        ))),
    }
}
