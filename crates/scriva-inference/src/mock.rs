//! Mock generation backend for deterministic testing.
//!
//! Records every prompt it receives and serves scripted responses, optional
//! latency, and failure injection. Enabled for this crate's own tests and
//! for downstream crates via the `mock` feature.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use scriva_core::{Error, GenerationBackend, Result};

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    substring_responses: Vec<(String, String)>,
    latency: Option<Duration>,
    failure: Option<String>,
    fail_first: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "mock response".to_string(),
            substring_responses: Vec::new(),
            latency: None,
            failure: None,
            fail_first: 0,
        }
    }
}

/// Mock generation backend.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockGenerationBackend {
    /// Create a mock with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned for any prompt without a mapping.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Map prompts containing `needle` to a specific response.
    ///
    /// Mappings are checked in insertion order before the default response.
    pub fn with_response_for(
        mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .substring_responses
            .push((needle.into(), response.into()));
        self
    }

    /// Add simulated latency to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = Some(latency);
        self
    }

    /// Make every call fail with a provider error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Make only the first `n` calls fail, then succeed.
    pub fn failing_first(mut self, n: usize, message: impl Into<String>) -> Self {
        let config = Arc::make_mut(&mut self.config);
        config.failure = Some(message.into());
        config.fail_first = n;
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Total number of generate calls.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };

        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = &self.config.failure {
            let still_failing = self.config.fail_first == 0 || call_index <= self.config.fail_first;
            if still_failing {
                return Err(Error::Provider(message.clone()));
            }
        }

        for (needle, response) in &self.config.substring_responses {
            if prompt.contains(needle) {
                return Ok(response.clone());
            }
        }
        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_prompts_and_counts_calls() {
        let mock = MockGenerationBackend::new();
        mock.generate("first").await.unwrap();
        mock.generate("second").await.unwrap();

        assert_eq!(mock.prompts(), vec!["first", "second"]);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn substring_mapping_wins_over_default() {
        let mock = MockGenerationBackend::new()
            .with_response("default")
            .with_response_for("keywords", "a, b, c");

        assert_eq!(
            mock.generate("Extract 5 keywords from this").await.unwrap(),
            "a, b, c"
        );
        assert_eq!(mock.generate("Summarize this").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn failing_first_recovers_after_n_calls() {
        let mock = MockGenerationBackend::new()
            .with_response("ok")
            .failing_first(2, "unavailable");

        assert!(mock.generate("p").await.is_err());
        assert!(mock.generate("p").await.is_err());
        assert_eq!(mock.generate("p").await.unwrap(), "ok");
    }
}
