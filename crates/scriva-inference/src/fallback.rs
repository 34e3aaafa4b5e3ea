//! Deterministic local analyzers used when the provider is unconfigured or
//! a remote call fails.
//!
//! These are pure functions over the content string: no I/O, no suspension,
//! no failure. They are the guaranteed terminal fallback for every analysis
//! method.

use std::collections::HashSet;

use scriva_core::{defaults, AnalysisMethod, AnalysisResult, Sentiment};

/// Stop words dropped by the fallback tag extractor.
const DEFAULT_STOP_WORDS: &[&str] = &["the", "and", "for", "with", "this", "that", "have", "from"];

/// Positive sentiment lexicon.
const DEFAULT_POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "happy", "success", "well", "positive",
];

/// Negative sentiment lexicon.
const DEFAULT_NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "failed", "unhappy", "problem", "issue", "negative",
];

/// Word lists for the fallback heuristics.
///
/// The exact membership is tunable, not a contract; the defaults mirror the
/// production lists.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    pub stop_words: HashSet<String>,
    pub positive_words: HashSet<String>,
    pub negative_words: HashSet<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        fn to_set(words: &[&str]) -> HashSet<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            stop_words: to_set(DEFAULT_STOP_WORDS),
            positive_words: to_set(DEFAULT_POSITIVE_WORDS),
            negative_words: to_set(DEFAULT_NEGATIVE_WORDS),
        }
    }
}

/// The fallback analyzer set.
#[derive(Debug, Clone, Default)]
pub struct FallbackAnalyzers {
    config: FallbackConfig,
}

impl FallbackAnalyzers {
    /// Create analyzers with the default word lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create analyzers with custom word lists.
    pub fn with_config(config: FallbackConfig) -> Self {
        Self { config }
    }

    /// Run the fallback analyzer for a method.
    pub fn analyze(&self, method: AnalysisMethod, text: &str) -> AnalysisResult {
        match method {
            AnalysisMethod::Summarize => AnalysisResult::Summary(self.summarize(text)),
            AnalysisMethod::ExtractTags => AnalysisResult::Tags(self.extract_tags(text)),
            AnalysisMethod::AnalyzeSentiment => {
                AnalysisResult::Sentiment(self.analyze_sentiment(text))
            }
        }
    }

    /// Heuristic summary: short text unchanged, otherwise the first two
    /// sentences rejoined with `.`.
    pub fn summarize(&self, text: &str) -> String {
        if text.chars().count() < defaults::FALLBACK_SUMMARY_MIN_LEN {
            return text.to_string();
        }

        let sentences: Vec<&str> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(defaults::FALLBACK_SUMMARY_SENTENCES)
            .collect();

        if sentences.is_empty() {
            // No terminal punctuation at all; nothing to trim down to.
            return text.to_string();
        }

        format!("{}.", sentences.join(". "))
    }

    /// Heuristic keywords: lowercase word tokens longer than three chars,
    /// stop words removed, deduplicated in first-seen order, capped at 5.
    ///
    /// Punctuation is deleted in place rather than treated as a separator,
    /// so a contraction stays one token instead of splitting into
    /// sub-threshold fragments.
    pub fn extract_tags(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect();

        let mut seen = HashSet::new();
        let mut tags = Vec::new();

        for word in cleaned.split_whitespace() {
            if word.chars().count() <= defaults::FALLBACK_TAG_MIN_TOKEN_LEN {
                continue;
            }
            if self.config.stop_words.contains(word) {
                continue;
            }
            if seen.insert(word.to_string()) {
                tags.push(word.to_string());
                if tags.len() == defaults::MAX_TAGS {
                    break;
                }
            }
        }

        tags
    }

    /// Heuristic sentiment: lexicon hit count difference over whitespace
    /// tokens of the lowercased text.
    pub fn analyze_sentiment(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let mut score: i64 = 0;

        for word in lowered.split_whitespace() {
            if self.config.positive_words.contains(word) {
                score += 1;
            }
            if self.config.negative_words.contains(word) {
                score -= 1;
            }
        }

        match score {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}
