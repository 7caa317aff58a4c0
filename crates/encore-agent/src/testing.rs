// ABOUTME: Test utilities for encore-agent: a stub generator and a scriptable resolver.
// ABOUTME: Used in tests to drive the playlist pipeline without real API calls.

use std::collections::HashSet;

use async_trait::async_trait;

use encore_core::model::Track;
use encore_upstream::UpstreamError;

use crate::generate::{GenerateError, TextGenerator};
use crate::playlist::TrackResolver;

/// A stub generator that returns a pre-configured response, or a fixed error.
pub struct StubGenerator {
    response: Result<String, String>,
}

impl StubGenerator {
    /// Always return the given text.
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    /// Always fail with a provider error carrying the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _instruction: &str) -> Result<String, GenerateError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(GenerateError::Provider(message.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// A scriptable resolver. By default every candidate resolves to a synthetic
/// track; individual titles can be set to miss (no match) or fail (lookup
/// error).
#[derive(Default)]
pub struct StubResolver {
    missing: HashSet<String>,
    failing: HashSet<String>,
}

impl StubResolver {
    /// Make lookups for this title return `Ok(None)`.
    pub fn missing_on(mut self, title: &str) -> Self {
        self.missing.insert(title.to_string());
        self
    }

    /// Make lookups for this title fail with a transport error.
    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }
}

#[async_trait]
impl TrackResolver for StubResolver {
    async fn resolve(&self, title: &str, artist: &str) -> Result<Option<Track>, UpstreamError> {
        if self.failing.contains(title) {
            return Err(UpstreamError::Transport {
                operation: "search".to_string(),
                message: format!("simulated failure for {}", title),
            });
        }
        if self.missing.contains(title) {
            return Ok(None);
        }

        let id = title.to_lowercase().replace(' ', "-");
        Ok(Some(Track {
            uri: format!("upstream:track:{}", id),
            name: title.to_string(),
            artists: vec![artist.to_string()],
            album: None,
            duration_ms: Some(210_000),
            image_url: None,
            id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_generator_returns_configured_text() {
        let generator = StubGenerator::new("[]");
        assert_eq!(generator.generate("anything").await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn stub_resolver_behaviors() {
        let resolver = StubResolver::default()
            .missing_on("Ghost Song")
            .failing_on("Broken Song");

        let hit = resolver.resolve("Real Song", "Someone").await.unwrap();
        assert_eq!(hit.unwrap().name, "Real Song");

        let miss = resolver.resolve("Ghost Song", "Someone").await.unwrap();
        assert!(miss.is_none());

        let err = resolver.resolve("Broken Song", "Someone").await;
        assert!(err.is_err());
    }
}
