//! Enrichment orchestrator: the pipeline façade.
//!
//! Coordinates one enrichment run per document: fetch, gate on content
//! length and annotation freshness, run the three analysis methods
//! concurrently through the router, merge what succeeded, and persist.
//! Word and character counts are always computed locally and written on
//! every run regardless of analyzer outcomes.
//!
//! Analyzer failures degrade to fallback heuristics and never fail a run;
//! storage failures always propagate.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use scriva_core::{
    char_count, defaults, word_count, AnalysisMethod, AnalysisResult, Annotation,
    AnnotationUpdate, BatchRequest, CacheStats, DocumentStore, Error, Result, Sentiment,
};

use crate::batch::BatchScheduler;
use crate::dedup::InFlightRegistry;
use crate::router::AnalysisRouter;

// =============================================================================
// CONFIG
// =============================================================================

/// Gating knobs for the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentConfig {
    /// Documents with fewer content characters than this are skipped.
    pub min_content_length: usize,
    /// Annotations younger than this are reused instead of recomputed,
    /// unless the caller forces a refresh.
    pub freshness_window_secs: i64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            min_content_length: defaults::MIN_CONTENT_LENGTH,
            freshness_window_secs: defaults::FRESHNESS_WINDOW_SECS as i64,
        }
    }
}

impl EnrichmentConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_content_length: std::env::var("SCRIVA_MIN_CONTENT_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_content_length),
            freshness_window_secs: std::env::var("SCRIVA_FRESHNESS_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.freshness_window_secs),
        }
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Outcome of one document within a batch enrichment.
#[derive(Debug, Clone)]
pub struct BatchEnrichResult {
    pub document_id: Uuid,
    /// `None` when the document was skipped (absent or content too short).
    pub annotation: Option<Annotation>,
}

/// The enrichment pipeline.
///
/// Cheap to clone; clones share the store, router, response cache, and
/// in-flight registry.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    store: Arc<dyn DocumentStore>,
    router: Arc<AnalysisRouter>,
    scheduler: BatchScheduler,
    in_flight: InFlightRegistry<Result<Option<Annotation>>>,
    config: EnrichmentConfig,
}

impl EnrichmentPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        router: AnalysisRouter,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            store,
            router: Arc::new(router),
            scheduler: BatchScheduler::new(),
            in_flight: InFlightRegistry::new(),
            config,
        }
    }

    /// Build with environment-derived provider, cache, and gating config.
    pub fn from_env(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(store, AnalysisRouter::from_env(), EnrichmentConfig::from_env())
    }

    /// Override the batch scheduler's pacing.
    pub fn with_scheduler(mut self, scheduler: BatchScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Start the periodic response cache eviction task.
    pub fn start_cache_sweeper(&self) -> tokio::task::JoinHandle<()> {
        Arc::clone(self.router.cache()).spawn_sweeper()
    }

    // =========================================================================
    // SINGLE-DOCUMENT ENRICHMENT
    // =========================================================================

    /// Enrich one document, coalescing with any run already in flight for
    /// the same document id.
    ///
    /// `Ok(None)` means the run was skipped: the document is absent or its
    /// content is below the minimum length. A fresh annotation (inside the
    /// freshness window) is returned as-is without recomputation unless
    /// `force_refresh` is set.
    pub async fn enrich(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        force_refresh: bool,
    ) -> Result<Option<Annotation>> {
        let this = self.clone();
        self.in_flight
            .run_exclusive(document_id, async move {
                this.perform_enrichment(tenant_id, document_id, force_refresh)
                    .await
            })
            .await
    }

    /// Kick off enrichment in the background and return immediately.
    ///
    /// The caller's request path never blocks on analysis; the outcome is
    /// logged, not returned.
    pub fn spawn_enrich(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        force_refresh: bool,
    ) -> tokio::task::JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            match this.enrich(tenant_id, document_id, force_refresh).await {
                Ok(Some(_)) => {
                    debug!(
                        subsystem = "pipeline",
                        %document_id,
                        "Background enrichment complete"
                    );
                }
                Ok(None) => {
                    debug!(
                        subsystem = "pipeline",
                        %document_id,
                        "Background enrichment skipped"
                    );
                }
                Err(err) => {
                    warn!(
                        subsystem = "pipeline",
                        %document_id,
                        error = %err,
                        "Background enrichment failed"
                    );
                }
            }
        })
    }

    #[instrument(
        skip(self),
        fields(subsystem = "pipeline", component = "orchestrator", %tenant_id, %document_id)
    )]
    async fn perform_enrichment(
        &self,
        tenant_id: Uuid,
        document_id: Uuid,
        force_refresh: bool,
    ) -> Result<Option<Annotation>> {
        let Some(document) = self.store.find_document(tenant_id, document_id).await? else {
            debug!("Document not found; skipping enrichment");
            return Ok(None);
        };

        if !self.analyzable(&document.content) {
            debug!(
                content_len = document.content.chars().count(),
                "Content too short to analyze"
            );
            return Ok(None);
        }

        if !force_refresh && self.is_fresh(&document.annotation) {
            debug!("Annotation still fresh; reusing");
            return Ok(Some(document.annotation));
        }

        let started = Instant::now();
        let content = document.content.as_str();

        let (summary, tags, sentiment) = tokio::join!(
            self.router.analyze(AnalysisMethod::Summarize, content),
            self.router.analyze(AnalysisMethod::ExtractTags, content),
            self.router.analyze(AnalysisMethod::AnalyzeSentiment, content),
        );
        let update = annotation_update(content, summary, tags, sentiment);

        self.store
            .update_annotation(document_id, update.clone())
            .await?;

        let mut annotation = document.annotation;
        update.apply_to(&mut annotation);

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            "Document enrichment complete"
        );
        Ok(Some(annotation))
    }

    fn analyzable(&self, content: &str) -> bool {
        content.chars().count() >= self.config.min_content_length
    }

    fn is_fresh(&self, annotation: &Annotation) -> bool {
        annotation.last_analyzed_at.is_some_and(|last| {
            Utc::now().signed_duration_since(last)
                < chrono::Duration::seconds(self.config.freshness_window_secs)
        })
    }

    // =========================================================================
    // BATCH ENRICHMENT
    // =========================================================================

    /// Enrich many documents through the batch scheduler.
    ///
    /// Absent and too-short documents are skipped (reported with a `None`
    /// annotation); every analyzable document is re-analyzed regardless of
    /// freshness. Results come back in the order of `document_ids`.
    /// Annotation writes are attempted for every document; the first
    /// storage error is returned only after the whole batch has been
    /// attempted.
    #[instrument(
        skip(self, document_ids),
        fields(subsystem = "pipeline", component = "orchestrator", %tenant_id, request_count = document_ids.len())
    )]
    pub async fn batch_enrich(
        &self,
        tenant_id: Uuid,
        document_ids: &[Uuid],
    ) -> Result<Vec<BatchEnrichResult>> {
        if document_ids.is_empty() {
            return Ok(Vec::new());
        }

        let fetched = join_all(
            document_ids
                .iter()
                .map(|id| self.store.find_document(tenant_id, *id)),
        )
        .await;

        let mut outcomes: Vec<BatchEnrichResult> = document_ids
            .iter()
            .map(|id| BatchEnrichResult {
                document_id: *id,
                annotation: None,
            })
            .collect();

        // Analyzable documents, with their position in the caller's list.
        let mut analyzable = Vec::new();
        for (position, fetch) in fetched.into_iter().enumerate() {
            match fetch? {
                Some(document) if self.analyzable(&document.content) => {
                    analyzable.push((position, document));
                }
                Some(_) => {
                    debug!(document_id = %document_ids[position], "Skipping short document in batch");
                }
                None => {
                    debug!(document_id = %document_ids[position], "Skipping missing document in batch");
                }
            }
        }

        let mut requests = Vec::with_capacity(analyzable.len() * AnalysisMethod::ALL.len());
        for (slot, (_, document)) in analyzable.iter().enumerate() {
            for (offset, method) in AnalysisMethod::ALL.into_iter().enumerate() {
                requests.push(BatchRequest {
                    method,
                    content: document.content.clone(),
                    index: slot * AnalysisMethod::ALL.len() + offset,
                });
            }
        }

        let mut results = self.scheduler.process(requests, &self.router).await.into_iter();

        // Every document gets its write attempted before a storage error
        // surfaces; one failed write never discards the rest of the batch.
        let mut first_write_error: Option<Error> = None;
        for (position, document) in analyzable {
            let (Some(summary), Some(tags), Some(sentiment)) =
                (results.next(), results.next(), results.next())
            else {
                return Err(Error::Request(
                    "batch scheduler returned a short result set".to_string(),
                ));
            };

            let update = annotation_update(&document.content, summary, tags, sentiment);
            match self
                .store
                .update_annotation(document.id, update.clone())
                .await
            {
                Ok(()) => {
                    let mut annotation = document.annotation;
                    update.apply_to(&mut annotation);
                    outcomes[position].annotation = Some(annotation);
                }
                Err(err) => {
                    warn!(
                        document_id = %document.id,
                        error = %err,
                        "Batch annotation write failed"
                    );
                    first_write_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = first_write_error {
            return Err(err);
        }

        info!(
            enriched = outcomes.iter().filter(|o| o.annotation.is_some()).count(),
            skipped = outcomes.iter().filter(|o| o.annotation.is_none()).count(),
            "Batch enrichment complete"
        );
        Ok(outcomes)
    }

    // =========================================================================
    // CACHE ADMINISTRATION
    // =========================================================================

    /// Snapshot of the response cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.router.cache().stats()
    }

    /// Drop every response cache entry.
    pub fn clear_cache(&self) {
        self.router.cache().clear()
    }
}

/// Merge three analysis results into a persistable update.
///
/// Counts and the analysis timestamp are computed here, locally, on every
/// run. A result of an unexpected variant leaves its field unset rather
/// than clobbering a stored value.
fn annotation_update(
    content: &str,
    summary: AnalysisResult,
    tags: AnalysisResult,
    sentiment: AnalysisResult,
) -> AnnotationUpdate {
    let summary = match summary {
        AnalysisResult::Summary(s) => Some(s),
        _ => None,
    };
    let tags: Option<Vec<String>> = match tags {
        AnalysisResult::Tags(t) => Some(t),
        _ => None,
    };
    let sentiment: Option<Sentiment> = match sentiment {
        AnalysisResult::Sentiment(s) => Some(s),
        _ => None,
    };

    AnnotationUpdate {
        summary,
        tags,
        sentiment,
        word_count: word_count(content),
        char_count: char_count(content),
        last_analyzed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_builder_computes_counts_locally() {
        let update = annotation_update(
            "three words here",
            AnalysisResult::Summary("s".into()),
            AnalysisResult::Tags(vec!["words".into()]),
            AnalysisResult::Sentiment(Sentiment::Neutral),
        );

        assert_eq!(update.word_count, 3);
        assert_eq!(update.char_count, 16);
        assert_eq!(update.summary.as_deref(), Some("s"));
        assert_eq!(update.tags, Some(vec!["words".to_string()]));
        assert_eq!(update.sentiment, Some(Sentiment::Neutral));
    }

    #[test]
    fn update_builder_drops_mismatched_variants() {
        let update = annotation_update(
            "content",
            AnalysisResult::Tags(vec![]),
            AnalysisResult::Summary("not tags".into()),
            AnalysisResult::Sentiment(Sentiment::Positive),
        );

        assert!(update.summary.is_none());
        assert!(update.tags.is_none());
        assert_eq!(update.sentiment, Some(Sentiment::Positive));
        // Counts are still present.
        assert_eq!(update.word_count, 1);
    }

    #[test]
    fn config_defaults_match_gating_constants() {
        let config = EnrichmentConfig::default();
        assert_eq!(config.min_content_length, defaults::MIN_CONTENT_LENGTH);
        assert_eq!(
            config.freshness_window_secs,
            defaults::FRESHNESS_WINDOW_SECS as i64
        );
    }
}
