//! Request routing: the cache → remote → fallback chain for one analysis.
//!
//! The router owns the full degradation policy for a single (method,
//! content) request. Callers pick between two entry points:
//! [`AnalysisRouter::try_remote_cached`], which surfaces provider errors so
//! the caller can substitute per item, and [`AnalysisRouter::analyze`],
//! which is terminal and always produces a result.
//!
//! Fallback results are never written to the response cache: a later run
//! with a healthy provider must get a real provider answer, not a cached
//! heuristic.

use std::sync::Arc;

use tracing::{debug, warn};

use scriva_core::{AnalysisMethod, AnalysisResult, Error, Result};
use scriva_inference::{FallbackAnalyzers, RemoteAnalyzer, ResponseCache};

/// Routes analysis requests through cache, provider, and fallback layers.
pub struct AnalysisRouter {
    remote: Option<RemoteAnalyzer>,
    fallback: FallbackAnalyzers,
    cache: Arc<ResponseCache>,
}

impl AnalysisRouter {
    pub fn new(
        remote: Option<RemoteAnalyzer>,
        fallback: FallbackAnalyzers,
        cache: Arc<ResponseCache>,
    ) -> Self {
        if remote.is_none() {
            warn!(
                subsystem = "pipeline",
                component = "router",
                "No provider credentials configured; all analyses use fallback heuristics"
            );
        }
        Self {
            remote,
            fallback,
            cache,
        }
    }

    /// Build from environment configuration with default fallback lexicons
    /// and cache TTL.
    pub fn from_env() -> Self {
        Self::new(
            RemoteAnalyzer::from_env(),
            FallbackAnalyzers::new(),
            Arc::new(ResponseCache::new()),
        )
    }

    /// Build around an already-constructed remote analyzer, with default
    /// fallback lexicons and cache TTL.
    pub fn with_remote(remote: RemoteAnalyzer) -> Self {
        debug!("Building analysis router with injected remote analyzer");
        Self::new(
            Some(remote),
            FallbackAnalyzers::new(),
            Arc::new(ResponseCache::new()),
        )
    }

    /// Whether a remote provider is configured for this process.
    pub fn remote_available(&self) -> bool {
        self.remote.is_some()
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn fallback(&self) -> &FallbackAnalyzers {
        &self.fallback
    }

    /// Cache check, then remote call, then cache write.
    ///
    /// Errors with [`Error::ProviderUnavailable`] when no provider is
    /// configured and [`Error::Provider`] on any provider failure; callers
    /// decide whether and how to substitute a fallback result.
    pub async fn try_remote_cached(
        &self,
        method: AnalysisMethod,
        text: &str,
    ) -> Result<AnalysisResult> {
        if let Some(result) = self.cache.get(method, text) {
            return Ok(result);
        }

        let remote = self.remote.as_ref().ok_or(Error::ProviderUnavailable)?;
        let result = remote.analyze(method, text).await?;
        self.cache.put(method, text, result.clone());
        Ok(result)
    }

    /// Terminal routing: never fails, substituting the fallback analyzer
    /// for any provider error or absence.
    pub async fn analyze(&self, method: AnalysisMethod, text: &str) -> AnalysisResult {
        if !self.remote_available() {
            // Globally-unavailable mode skips the cache entirely; only
            // provider results are ever cached, so it cannot hit.
            return self.fallback.analyze(method, text);
        }

        match self.try_remote_cached(method, text).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    subsystem = "pipeline",
                    component = "router",
                    %method,
                    fallback = true,
                    error = %err,
                    "Provider analysis failed; using fallback heuristic"
                );
                self.fallback.analyze(method, text)
            }
        }
    }
}

impl std::fmt::Debug for AnalysisRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisRouter")
            .field("remote_available", &self.remote_available())
            .finish()
    }
}
