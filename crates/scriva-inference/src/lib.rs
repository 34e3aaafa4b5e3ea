//! # scriva-inference
//!
//! Generative provider client, fallback analyzers, and response cache for
//! the scriva enrichment pipeline.
//!
//! This crate provides:
//! - `GeminiBackend`: thin client over a generateContent-style endpoint
//! - `RemoteAnalyzer`: the three analysis methods (summary, tags,
//!   sentiment) with input budgets, post-processing, and a per-call timeout
//! - `FallbackAnalyzers`: deterministic local heuristics used when the
//!   provider is unconfigured or a call fails
//! - `ResponseCache`: content-addressed result cache with TTL expiry
//!
//! # Feature Flags
//!
//! - `mock`: expose the deterministic mock backend to downstream crates

pub mod analyzer;
pub mod cache;
pub mod fallback;
pub mod gemini;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use scriva_core::*;

pub use analyzer::RemoteAnalyzer;
pub use cache::ResponseCache;
pub use fallback::{FallbackAnalyzers, FallbackConfig};
pub use gemini::GeminiBackend;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerationBackend;
