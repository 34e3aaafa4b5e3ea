//! Gemini generative backend implementation.
//!
//! Thin client over the `generateContent` endpoint. The backend requires an
//! API key at construction: `from_env` returns `None` without one, which the
//! pipeline treats as "provider globally unavailable" and routes every
//! request straight to the fallback analyzers.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use scriva_core::{defaults, Error, GenerationBackend, Result};

/// Default generative endpoint base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = defaults::GEMINI_BASE_URL;

/// Default generation model.
pub const DEFAULT_GEMINI_MODEL: &str = defaults::GEMINI_MODEL;

/// Gemini generation backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiBackend {
    /// Create a new backend with an explicit API key and defaults elsewhere.
    pub fn new(api_key: String) -> Self {
        Self::with_config(
            DEFAULT_GEMINI_BASE_URL.to_string(),
            DEFAULT_GEMINI_MODEL.to_string(),
            api_key,
        )
    }

    /// Create a new backend with custom configuration.
    pub fn with_config(base_url: String, model: String, api_key: String) -> Self {
        let timeout_secs = std::env::var("SCRIVA_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!("Initializing Gemini backend: url={}, model={}", base_url, model);

        Self {
            client,
            base_url,
            model,
            api_key,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    ///
    /// Returns `None` when `GEMINI_API_KEY` is unset or empty: missing
    /// credentials are a mode switch to fallback-only, not an error.
    pub fn from_env() -> Option<Self> {
        // Pick up a local .env if present; real environment variables win.
        dotenvy::dotenv().ok();

        let api_key = match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                warn!("GEMINI_API_KEY not set; enrichment runs in fallback-only mode");
                return None;
            }
        };

        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        Some(Self::with_config(base_url, model, api_key))
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "gemini", op = "generate", model = %self.model, content_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Failed to parse response: {}", e)))?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Provider("Empty response: no candidates".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = text.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 10_000 {
            warn!(duration_ms = elapsed, slow = true, "Slow generation call");
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
