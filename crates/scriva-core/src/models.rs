//! Data model types for documents and their AI-derived annotations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// DOCUMENT & ANNOTATION
// =============================================================================

/// A stored document, owned by the persistence layer.
///
/// The pipeline reads `content` and writes the `annotation` block; it never
/// mutates the other fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    #[serde(default)]
    pub annotation: Annotation,
}

/// AI-derived metadata attached to a document.
///
/// Invariant: when `last_analyzed_at` is set, all three analyses were
/// attempted; an individual field may still be absent if that sub-analysis
/// failed and no fallback ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub sentiment: Option<Sentiment>,
    pub word_count: Option<i64>,
    pub char_count: Option<i64>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

/// A partial annotation write produced by one enrichment run.
///
/// `None` analysis fields are left untouched in storage so a single failed
/// method does not clobber an earlier result. The counts and timestamp are
/// always present: they are computed locally, never by an analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationUpdate {
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    pub sentiment: Option<Sentiment>,
    pub word_count: i64,
    pub char_count: i64,
    pub last_analyzed_at: DateTime<Utc>,
}

impl AnnotationUpdate {
    /// Apply this update on top of an existing annotation.
    pub fn apply_to(&self, annotation: &mut Annotation) {
        if let Some(summary) = &self.summary {
            annotation.summary = Some(summary.clone());
        }
        if let Some(tags) = &self.tags {
            annotation.tags = tags.clone();
        }
        if let Some(sentiment) = self.sentiment {
            annotation.sentiment = Some(sentiment);
        }
        annotation.word_count = Some(self.word_count);
        annotation.char_count = Some(self.char_count);
        annotation.last_analyzed_at = Some(self.last_analyzed_at);
    }
}

/// Document sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parse a provider label, constraining to the three allowed values.
    ///
    /// Unrecognized labels default to `Neutral` rather than erroring, since
    /// generative providers occasionally return free-form prose.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

// =============================================================================
// ANALYSIS DISPATCH
// =============================================================================

/// The three analysis methods the pipeline runs per document.
///
/// Dispatch is keyed on this enum everywhere (cache namespacing, batch
/// grouping, fallback selection); there is no name-based runtime lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    Summarize,
    ExtractTags,
    AnalyzeSentiment,
}

impl AnalysisMethod {
    /// All methods, in the order an enrichment run executes them.
    pub const ALL: [AnalysisMethod; 3] = [
        AnalysisMethod::Summarize,
        AnalysisMethod::ExtractTags,
        AnalysisMethod::AnalyzeSentiment,
    ];
}

impl std::fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summarize => write!(f, "summarize"),
            Self::ExtractTags => write!(f, "extract_tags"),
            Self::AnalyzeSentiment => write!(f, "analyze_sentiment"),
        }
    }
}

/// Result of one analysis method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AnalysisResult {
    Summary(String),
    Tags(Vec<String>),
    Sentiment(Sentiment),
}

impl AnalysisResult {
    /// The method that produced this result.
    pub fn method(&self) -> AnalysisMethod {
        match self {
            Self::Summary(_) => AnalysisMethod::Summarize,
            Self::Tags(_) => AnalysisMethod::ExtractTags,
            Self::Sentiment(_) => AnalysisMethod::AnalyzeSentiment,
        }
    }
}

/// One unit of work for the batch scheduler.
///
/// Created per (document, method) at batch-submission time, consumed exactly
/// once, and discarded after results are mapped back by `index`.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub method: AnalysisMethod,
    pub content: String,
    /// Reassembly slot, assigned by the batch scheduler at submission;
    /// results come back in this order regardless of method grouping or
    /// chunk scheduling.
    pub index: usize,
}

// =============================================================================
// CACHE STATS
// =============================================================================

/// Snapshot of response cache occupancy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub per_method: HashMap<AnalysisMethod, usize>,
}

// =============================================================================
// LOCAL TEXT MEASURES
// =============================================================================

/// Word count as the persistence layer expects it (whitespace tokens).
pub fn word_count(text: &str) -> i64 {
    text.split_whitespace().count() as i64
}

/// Character count of the raw content string.
pub fn char_count(text: &str) -> i64 {
    text.chars().count() as i64
}
