// ABOUTME: Anthropic Claude API adapter implementing the TextGenerator trait.
// ABOUTME: Issues one Messages API call per instruction and extracts the text content.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::generate::{GenerateError, TextGenerator};
use crate::providers::non_empty_env;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic Claude adapter. Sends the instruction as a single user message
/// and returns the concatenated text blocks of the response.
pub struct AnthropicGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicGenerator {
    /// Create an adapter reading configuration from environment variables.
    /// Required: `ANTHROPIC_API_KEY`
    /// Optional: `ANTHROPIC_BASE_URL` (defaults to https://api.anthropic.com)
    /// Optional: `ANTHROPIC_MODEL` (defaults to claude-sonnet-4-5-20250929)
    pub fn from_env(model: Option<&str>) -> Result<Self, GenerateError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| GenerateError::NotConfigured("ANTHROPIC_API_KEY not set".to_string()))?;

        let base_url =
            non_empty_env("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = model
            .map(String::from)
            .or_else(|| non_empty_env("ANTHROPIC_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create an adapter with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the Messages API.
    pub fn build_request_body(&self, instruction: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                { "role": "user", "content": instruction }
            ]
        })
    }

    /// Extract the response text from a Messages API response body.
    pub fn parse_response(response_body: &Value) -> Result<String, GenerateError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                GenerateError::InvalidResponse("missing content array in response".to_string())
            })?;

        let text: String = content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(GenerateError::InvalidResponse(
                "no text content in response".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerateError> {
        let body = self.build_request_body(instruction);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerateError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(GenerateError::Provider(
                "Unauthorized: check ANTHROPIC_API_KEY".to_string(),
            ));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Provider(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidResponse(format!("failed to parse JSON: {}", e)))?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
