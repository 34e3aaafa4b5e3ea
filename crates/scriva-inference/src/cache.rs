//! Content-addressed response cache for provider results.
//!
//! Keys are a SHA-256 digest of the exact content string, namespaced by
//! analysis method. Identical content always maps to the same entry no
//! matter which document it came from; collision resistance is a
//! correctness requirement, since a collision would surface wrong AI output
//! for an unrelated document.
//!
//! Expiry is enforced twice: reads independently check entry age against
//! the TTL, and an explicit sweeper task physically evicts expired entries
//! so sweep latency can never cause a stale hit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::{debug, info};

use scriva_core::{defaults, AnalysisMethod, AnalysisResult, CacheStats};

/// Cache key: method namespace plus content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    method: AnalysisMethod,
    digest: [u8; 32],
}

impl CacheKey {
    fn for_content(method: AnalysisMethod, content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        Self {
            method,
            digest: digest.into(),
        }
    }

    /// Digest prefix for log correlation.
    fn short_digest(&self) -> String {
        hex::encode(&self.digest[..6])
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: AnalysisResult,
    created_at: Instant,
}

/// In-memory response cache with time-based expiry.
///
/// Process-wide singleton shared by all tenants; memory-resident only, so a
/// process restart is a full flush (annotations already persisted are
/// unaffected). Injectable rather than ambient so tests can construct and
/// inspect their own instance.
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(defaults::CACHE_TTL_SECS))
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a cached result. Entries older than the TTL are treated as
    /// absent even if not yet physically evicted.
    pub fn get(&self, method: AnalysisMethod, content: &str) -> Option<AnalysisResult> {
        let key = CacheKey::for_content(method, content);
        let entries = self.entries.lock().expect("cache lock poisoned");

        let entry = entries.get(&key)?;
        if entry.created_at.elapsed() >= self.ttl {
            debug!(%method, "Cache entry expired on read");
            return None;
        }

        debug!(
            %method,
            digest = %key.short_digest(),
            cache_hit = true,
            "Response cache hit"
        );
        Some(entry.result.clone())
    }

    /// Store a computed result.
    pub fn put(&self, method: AnalysisMethod, content: &str, result: AnalysisResult) {
        let key = CacheKey::for_content(method, content);
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                result,
                created_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let dropped = entries.len();
        entries.clear();
        info!(evicted = dropped, "Response cache cleared");
    }

    /// Snapshot of total and per-method entry counts.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().expect("cache lock poisoned");
        let mut per_method: HashMap<AnalysisMethod, usize> = HashMap::new();
        for key in entries.keys() {
            *per_method.entry(key.method).or_default() += 1;
        }
        CacheStats {
            total_entries: entries.len(),
            per_method,
        }
    }

    /// Physically remove expired entries. Returns the eviction count.
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.created_at.elapsed() < ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "Cache sweep evicted expired entries");
        }
        evicted
    }

    /// Start the periodic eviction task with the default interval.
    ///
    /// The task runs for the life of the process (or until the handle is
    /// aborted); reads never depend on it for correctness.
    pub fn spawn_sweeper(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.spawn_sweeper_with_interval(Duration::from_secs(defaults::CACHE_SWEEP_INTERVAL_SECS))
    }

    /// Start the periodic eviction task with a custom interval.
    pub fn spawn_sweeper_with_interval(
        self: Arc<Self>,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        let cache = self;
        info!(
            interval_secs = interval.as_secs(),
            "Starting response cache sweeper"
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a fresh cache
            // isn't swept at startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.sweep();
            }
        })
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
