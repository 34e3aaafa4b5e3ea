//! Remote analyzer: the three analysis methods layered over a raw
//! generation backend.
//!
//! Each call truncates its input to a method-specific character budget
//! (bounding provider cost and latency), issues exactly one provider
//! request under a per-call timeout, and post-processes the raw text
//! response. Provider failures surface as [`scriva_core::Error::Provider`];
//! the analyzer never falls back itself — that policy belongs to the
//! orchestrator and batch scheduler.

use std::time::Duration;

use tracing::{debug, instrument};

use scriva_core::{
    defaults, AnalysisMethod, AnalysisResult, Error, GenerationBackend, Result, Sentiment,
};

use crate::gemini::GeminiBackend;

/// Truncate to at most `budget` characters, respecting char boundaries.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Analyzer over an external generative provider.
pub struct RemoteAnalyzer {
    backend: Box<dyn GenerationBackend>,
    timeout: Duration,
}

impl RemoteAnalyzer {
    /// Wrap a generation backend with the default per-call timeout.
    pub fn new(backend: Box<dyn GenerationBackend>) -> Self {
        Self::with_timeout(
            backend,
            Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS),
        )
    }

    /// Wrap a generation backend with a custom per-call timeout.
    pub fn with_timeout(backend: Box<dyn GenerationBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Build from environment configuration.
    ///
    /// `None` when no provider credentials are configured; callers must
    /// then route every request to the fallback analyzers.
    pub fn from_env() -> Option<Self> {
        GeminiBackend::from_env().map(|backend| Self::new(Box::new(backend)))
    }

    /// Run one analysis method against the provider.
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "analyzer", %method, content_len = text.len()))]
    pub async fn analyze(&self, method: AnalysisMethod, text: &str) -> Result<AnalysisResult> {
        match method {
            AnalysisMethod::Summarize => self.summarize(text).await.map(AnalysisResult::Summary),
            AnalysisMethod::ExtractTags => self.extract_tags(text).await.map(AnalysisResult::Tags),
            AnalysisMethod::AnalyzeSentiment => self
                .analyze_sentiment(text)
                .await
                .map(AnalysisResult::Sentiment),
        }
    }

    /// Summarize the text in a few sentences.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let prompt = format!(
            "Summarize this in 2-3 sentences: {}",
            truncate_chars(text, defaults::SUMMARIZE_INPUT_BUDGET)
        );
        let raw = self.generate(&prompt).await?;
        Ok(raw.trim().to_string())
    }

    /// Extract up to five lowercase keywords.
    pub async fn extract_tags(&self, text: &str) -> Result<Vec<String>> {
        let prompt = format!(
            "Extract 5 keywords from this text. Return as comma list: {}",
            truncate_chars(text, defaults::TAGS_INPUT_BUDGET)
        );
        let raw = self.generate(&prompt).await?;

        let tags: Vec<String> = raw
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .take(defaults::MAX_TAGS)
            .collect();

        debug!(tag_count = tags.len(), "Parsed provider tag list");
        Ok(tags)
    }

    /// Classify sentiment, constrained to the three allowed labels.
    pub async fn analyze_sentiment(&self, text: &str) -> Result<Sentiment> {
        let prompt = format!(
            "Analyze sentiment. Respond with one word (positive/negative/neutral): {}",
            truncate_chars(text, defaults::SENTIMENT_INPUT_BUDGET)
        );
        let raw = self.generate(&prompt).await?;
        Ok(Sentiment::from_label(&raw))
    }

    /// Issue one provider request under the per-call timeout.
    ///
    /// Timeout expiry is indistinguishable from any other provider failure
    /// for callers: both trigger the fallback path.
    async fn generate(&self, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.backend.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Provider(format!(
                "Call timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multi-byte chars must not be split mid-sequence.
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[tokio::test]
    async fn summarize_trims_provider_output() {
        let backend = MockGenerationBackend::new().with_response("  A tidy summary.\n");
        let analyzer = RemoteAnalyzer::new(Box::new(backend));

        let summary = analyzer.summarize("some document content").await.unwrap();
        assert_eq!(summary, "A tidy summary.");
    }

    #[tokio::test]
    async fn extract_tags_cleans_and_caps_list() {
        let backend =
            MockGenerationBackend::new().with_response("Rust, Async , CACHING,, pipeline, extra, overflow");
        let analyzer = RemoteAnalyzer::new(Box::new(backend));

        let tags = analyzer.extract_tags("content").await.unwrap();
        assert_eq!(tags, vec!["rust", "async", "caching", "pipeline", "extra"]);
    }

    #[tokio::test]
    async fn sentiment_constrains_unknown_labels_to_neutral() {
        let backend = MockGenerationBackend::new().with_response("enthusiastically upbeat");
        let analyzer = RemoteAnalyzer::new(Box::new(backend));

        let sentiment = analyzer.analyze_sentiment("content").await.unwrap();
        assert_eq!(sentiment, Sentiment::Neutral);
    }

    #[tokio::test]
    async fn sentiment_parses_recognized_label() {
        let backend = MockGenerationBackend::new().with_response("Negative\n");
        let analyzer = RemoteAnalyzer::new(Box::new(backend));

        let sentiment = analyzer.analyze_sentiment("content").await.unwrap();
        assert_eq!(sentiment, Sentiment::Negative);
    }

    #[tokio::test]
    async fn input_is_truncated_to_method_budget() {
        let backend = MockGenerationBackend::new().with_response("ok");
        let analyzer = RemoteAnalyzer::new(Box::new(backend.clone()));

        let long_text = "x".repeat(10_000);
        analyzer.analyze_sentiment(&long_text).await.unwrap();

        let prompts = backend.prompts();
        assert_eq!(prompts.len(), 1);
        // Prompt preamble plus at most the sentiment budget of content.
        assert!(prompts[0].len() < defaults::SENTIMENT_INPUT_BUDGET + 100);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_without_fallback() {
        let backend = MockGenerationBackend::new().failing("boom");
        let analyzer = RemoteAnalyzer::new(Box::new(backend));

        let err = analyzer.summarize("content").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_expires_into_provider_error() {
        let backend = MockGenerationBackend::new()
            .with_response("late")
            .with_latency(Duration::from_secs(120));
        let analyzer =
            RemoteAnalyzer::with_timeout(Box::new(backend), Duration::from_secs(30));

        let err = analyzer.summarize("content").await.unwrap_err();
        match err {
            Error::Provider(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn analyze_dispatches_by_method() {
        let backend = MockGenerationBackend::new().with_response("positive");
        let analyzer = RemoteAnalyzer::new(Box::new(backend));

        let result = analyzer
            .analyze(AnalysisMethod::AnalyzeSentiment, "content")
            .await
            .unwrap();
        assert_eq!(result, AnalysisResult::Sentiment(Sentiment::Positive));
    }
}
