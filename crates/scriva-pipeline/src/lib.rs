//! Enrichment pipeline orchestration for scriva.
//!
//! This crate provides:
//! - `router`: the cache → remote → fallback chain for a single analysis
//! - `dedup`: in-flight run coalescing keyed by document id
//! - `batch`: grouped, chunked, paced dispatch of analysis batches
//! - `orchestrator`: the [`EnrichmentPipeline`] façade tying it together
//!
//! The pipeline is storage-agnostic: embedders supply a
//! [`scriva_core::DocumentStore`] implementation and get back enrichment
//! entry points (awaited, fire-and-forget, and batch) plus response cache
//! administration.

pub mod batch;
pub mod dedup;
pub mod orchestrator;
pub mod router;

// Re-export the shared vocabulary so embedders depend on one crate.
pub use scriva_core::*;

pub use batch::BatchScheduler;
pub use dedup::InFlightRegistry;
pub use orchestrator::{BatchEnrichResult, EnrichmentConfig, EnrichmentPipeline};
pub use router::AnalysisRouter;
