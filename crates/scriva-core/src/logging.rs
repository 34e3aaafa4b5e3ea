//! Structured logging schema and field name constants for scriva.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, cache hits/misses, config choices |
//! | TRACE | Per-item iteration within a batch |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "inference", "cache", "pipeline"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "gemini", "response_cache", "batch_scheduler", "orchestrator"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "generate", "enrich", "batch_enrich", "sweep"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Document UUID being enriched.
pub const DOCUMENT_ID: &str = "document_id";

/// Tenant UUID scoping the operation.
pub const TENANT_ID: &str = "tenant_id";

/// Analysis method enum variant.
pub const METHOD: &str = "method";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt or content string.
pub const CONTENT_LEN: &str = "content_len";

/// Number of requests in a batch.
pub const REQUEST_COUNT: &str = "request_count";

/// Number of entries evicted by a cache sweep.
pub const EVICTED: &str = "evicted";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Whether the result came from the response cache.
pub const CACHE_HIT: &str = "cache_hit";

/// Whether a fallback analyzer produced the result.
pub const FALLBACK: &str = "fallback";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize a tracing subscriber for tests and local runs.
///
/// Respects `RUST_LOG`; safe to call more than once (subsequent calls are
/// no-ops since a global subscriber is already installed).
pub fn init_for_tests() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
