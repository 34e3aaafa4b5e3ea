//! Batch scheduler: grouped, chunked, paced dispatch of analysis requests.
//!
//! Requests are grouped by method, each group is dispatched in chunks of a
//! fixed size with all requests in a chunk in flight concurrently, and a
//! fixed pause separates consecutive chunks (rate limiting toward the
//! provider). Per-item provider failures are substituted with the fallback
//! result for that item; one bad request never poisons its chunk. Results
//! always come back in the caller's original request order.
//!
//! When no provider is configured the scheduler skips grouping, chunking,
//! and pacing entirely and maps every request through the fallback
//! analyzers.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use scriva_core::{defaults, AnalysisMethod, AnalysisResult, BatchRequest};

use crate::router::AnalysisRouter;

/// Scheduler for provider-bound analysis batches.
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    chunk_size: usize,
    chunk_delay: Duration,
}

impl BatchScheduler {
    pub fn new() -> Self {
        Self {
            chunk_size: defaults::BATCH_CHUNK_SIZE,
            chunk_delay: Duration::from_millis(defaults::BATCH_CHUNK_DELAY_MS),
        }
    }

    /// Override the chunk size and inter-chunk delay.
    pub fn with_pacing(chunk_size: usize, chunk_delay: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_delay,
        }
    }

    /// Process a batch, returning one result per request in input order.
    ///
    /// Reassembly slots are assigned positionally at submission; any
    /// caller-supplied `index` is overwritten, so malformed indices cannot
    /// misroute or drop results.
    pub async fn process(
        &self,
        mut requests: Vec<BatchRequest>,
        router: &AnalysisRouter,
    ) -> Vec<AnalysisResult> {
        if requests.is_empty() {
            return Vec::new();
        }
        for (position, request) in requests.iter_mut().enumerate() {
            request.index = position;
        }

        if !router.remote_available() {
            debug!(
                subsystem = "pipeline",
                component = "batch",
                request_count = requests.len(),
                "No provider configured; serving batch from fallback analyzers"
            );
            return requests
                .iter()
                .map(|req| router.fallback().analyze(req.method, &req.content))
                .collect();
        }

        let total = requests.len();
        let mut slots: Vec<Option<AnalysisResult>> = vec![None; total];

        let mut groups: HashMap<AnalysisMethod, Vec<BatchRequest>> = HashMap::new();
        for request in requests {
            groups.entry(request.method).or_default().push(request);
        }

        // Iterate groups in fixed method order so scheduling is
        // deterministic for a given input.
        for method in AnalysisMethod::ALL {
            let Some(group) = groups.remove(&method) else {
                continue;
            };

            info!(
                subsystem = "pipeline",
                component = "batch",
                %method,
                request_count = group.len(),
                "Dispatching batch group"
            );

            let chunk_count = group.len().div_ceil(self.chunk_size);
            for (chunk_idx, chunk) in group.chunks(self.chunk_size).enumerate() {
                let outcomes = join_all(
                    chunk
                        .iter()
                        .map(|req| router.try_remote_cached(req.method, &req.content)),
                )
                .await;

                for (req, outcome) in chunk.iter().zip(outcomes) {
                    let result = match outcome {
                        Ok(result) => result,
                        Err(err) => {
                            warn!(
                                subsystem = "pipeline",
                                component = "batch",
                                %method,
                                fallback = true,
                                error = %err,
                                "Batch item failed; substituting fallback result"
                            );
                            router.fallback().analyze(req.method, &req.content)
                        }
                    };
                    slots[req.index] = Some(result);
                }

                // Pace between chunks, not after the last one.
                if chunk_idx + 1 < chunk_count {
                    tokio::time::sleep(self.chunk_delay).await;
                }
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.expect("every request index maps to one result slot"))
            .collect()
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new()
    }
}
