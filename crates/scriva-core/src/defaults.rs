//! Centralized default constants for the scriva enrichment pipeline.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area; document the rationale when adding a
//! constant.

// =============================================================================
// RESPONSE CACHE
// =============================================================================

/// Time-to-live for cached analysis results in seconds (1 hour).
///
/// Reads independently check entry age so a slow sweep never surfaces a
/// stale hit.
pub const CACHE_TTL_SECS: u64 = 3600;

/// Interval between physical eviction sweeps in seconds.
pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 60;

// =============================================================================
// PROVIDER
// =============================================================================

/// Default generative endpoint base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model.
pub const GEMINI_MODEL: &str = "gemini-pro";

/// Per-call provider timeout in seconds. Expiry is treated identically to
/// a provider failure and triggers the fallback analyzer.
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Input character budget for summarization prompts.
pub const SUMMARIZE_INPUT_BUDGET: usize = 3000;

/// Input character budget for tag extraction prompts.
pub const TAGS_INPUT_BUDGET: usize = 2000;

/// Input character budget for sentiment prompts.
pub const SENTIMENT_INPUT_BUDGET: usize = 1500;

// =============================================================================
// BATCH SCHEDULING
// =============================================================================

/// Requests dispatched concurrently per chunk (the provider's concurrency
/// budget).
pub const BATCH_CHUNK_SIZE: usize = 3;

/// Pacing delay between successive chunks in milliseconds.
pub const BATCH_CHUNK_DELAY_MS: u64 = 1000;

// =============================================================================
// ENRICHMENT
// =============================================================================

/// Minimum content length (characters) for enrichment to be worthwhile.
pub const MIN_CONTENT_LENGTH: usize = 20;

/// Document-level freshness window in seconds: a document analyzed within
/// this window is not re-analyzed unless forced.
pub const FRESHNESS_WINDOW_SECS: i64 = 3600;

// =============================================================================
// FALLBACK ANALYZERS
// =============================================================================

/// Text shorter than this is returned unchanged by the fallback summarizer.
pub const FALLBACK_SUMMARY_MIN_LEN: usize = 100;

/// Sentences kept by the fallback summarizer.
pub const FALLBACK_SUMMARY_SENTENCES: usize = 2;

/// Tokens shorter than or equal to this are dropped by the tag extractor.
pub const FALLBACK_TAG_MIN_TOKEN_LEN: usize = 3;

/// Maximum number of tags produced by either analysis path.
pub const MAX_TAGS: usize = 5;
