// ABOUTME: OpenAI API adapter implementing the TextGenerator trait.
// ABOUTME: Issues one Chat Completions call per instruction and extracts the message content.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::generate::{GenerateError, TextGenerator};
use crate::providers::non_empty_env;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 4096;

/// OpenAI adapter. Sends the instruction as a single user message and
/// returns the first choice's message content.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Create an adapter reading configuration from environment variables.
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_BASE_URL` (defaults to https://api.openai.com)
    /// Optional: `OPENAI_MODEL` (defaults to gpt-4o)
    pub fn from_env(model: Option<&str>) -> Result<Self, GenerateError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GenerateError::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        let base_url =
            non_empty_env("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = model
            .map(String::from)
            .or_else(|| non_empty_env("OPENAI_MODEL"))
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

    /// Build the JSON request body for the Chat Completions API.
    pub fn build_request_body(&self, instruction: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                { "role": "user", "content": instruction }
            ]
        })
    }

    /// Extract the response text from a Chat Completions response body.
    pub fn parse_response(response_body: &Value) -> Result<String, GenerateError> {
        let text = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .ok_or_else(|| {
                GenerateError::InvalidResponse("missing message content in response".to_string())
            })?;

        if text.is_empty() {
            return Err(GenerateError::InvalidResponse(
                "empty message content in response".to_string(),
            ));
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerateError> {
        let body = self.build_request_body(instruction);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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
                "Unauthorized: check OPENAI_API_KEY".to_string(),
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
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
