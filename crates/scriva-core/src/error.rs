//! Error types for the scriva enrichment pipeline.

use thiserror::Error;

/// Result type alias using scriva's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for enrichment operations.
///
/// Every variant carries owned strings rather than source errors so the
/// enum stays `Clone`: the in-flight deduplicator hands one outcome to
/// every coalesced caller, and each of them gets its own copy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A single provider call failed (network, API error, timeout).
    #[error("Provider error: {0}")]
    Provider(String),

    /// No provider credentials are configured. This is a mode switch,
    /// not a failure: callers route to the fallback analyzers.
    #[error("Provider unavailable: no credentials configured")]
    ProviderUnavailable,

    /// Document missing at enrichment time.
    #[error("Document not found: {0}")]
    NotFound(uuid::Uuid),

    /// Persistence layer failure. Unlike AI errors these propagate.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed.
    #[error("Request error: {0}")]
    Request(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
