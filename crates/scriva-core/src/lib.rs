//! # scriva-core
//!
//! Core types, traits, and abstractions for the scriva enrichment pipeline.
//!
//! This crate provides:
//! - The document and annotation data model
//! - The `DocumentStore` seam to the persistence layer
//! - The `GenerationBackend` seam to the generative provider
//! - The shared error type and `Result` alias
//! - Centralized default constants and the structured-logging schema

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    char_count, word_count, AnalysisMethod, AnalysisResult, Annotation, AnnotationUpdate,
    BatchRequest, CacheStats, Document, Sentiment,
};
pub use traits::{DocumentStore, GenerationBackend};
