//! In-flight run deduplication keyed by document id.
//!
//! While an enrichment run for a document is in flight, later callers for
//! the same document await the existing run's shared future instead of
//! starting another. All coalesced callers observe the identical outcome,
//! success or failure. The registry entry is removed before the outcome is
//! delivered, so a call issued after completion always starts a fresh run.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;
use uuid::Uuid;

type SharedRun<T> = Shared<BoxFuture<'static, T>>;

/// Registry of in-flight runs, one slot per document id.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct InFlightRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    runs: Arc<Mutex<HashMap<Uuid, SharedRun<T>>>>,
}

impl<T> InFlightRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            runs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of runs currently in flight.
    pub fn in_flight(&self) -> usize {
        self.runs.lock().expect("in-flight lock poisoned").len()
    }

    /// Run `producer` under the key, or join the run already in flight.
    ///
    /// The producer is not started (or even constructed into the map) when
    /// a run exists; the duplicate caller just awaits the shared outcome.
    pub async fn run_exclusive<F>(&self, key: Uuid, producer: F) -> T
    where
        F: Future<Output = T> + Send + 'static,
    {
        let run = {
            let mut runs = self.runs.lock().expect("in-flight lock poisoned");
            if let Some(existing) = runs.get(&key) {
                debug!(
                    subsystem = "pipeline",
                    component = "dedup",
                    document_id = %key,
                    "Joining in-flight run"
                );
                existing.clone()
            } else {
                let registry = Arc::clone(&self.runs);
                let run: SharedRun<T> = async move {
                    let outcome = producer.await;
                    // Deregister before any awaiter sees the value, so a
                    // follow-up call cannot join a completed run.
                    registry
                        .lock()
                        .expect("in-flight lock poisoned")
                        .remove(&key);
                    outcome
                }
                .boxed()
                .shared();
                runs.insert(key, run.clone());
                run
            }
        };

        run.await
    }
}

impl<T> Default for InFlightRegistry<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_share_one_run() {
        let registry: InFlightRegistry<usize> = InFlightRegistry::new();
        let started = Arc::new(AtomicUsize::new(0));

        let producer = |counter: Arc<AtomicUsize>| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            42
        };

        let key = Uuid::new_v4();
        let (a, b) = tokio::join!(
            registry.run_exclusive(key, producer(Arc::clone(&started))),
            registry.run_exclusive(key, producer(Arc::clone(&started))),
        );

        assert_eq!(a, 42);
        assert_eq!(b, 42);
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sequential_calls_each_run() {
        let registry: InFlightRegistry<usize> = InFlightRegistry::new();
        let started = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&started);
            let key = Uuid::nil();
            let out = registry
                .run_exclusive(key, async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    7
                })
                .await;
            assert_eq!(out, 7);
        }

        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_run_independently() {
        let registry: InFlightRegistry<Uuid> = InFlightRegistry::new();
        let k1 = Uuid::new_v4();
        let k2 = Uuid::new_v4();

        let (a, b) = tokio::join!(
            registry.run_exclusive(k1, async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                k1
            }),
            registry.run_exclusive(k2, async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                k2
            }),
        );

        assert_eq!(a, k1);
        assert_eq!(b, k2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_outcomes_are_shared_too() {
        use scriva_core::{Error, Result};

        let registry: InFlightRegistry<Result<()>> = InFlightRegistry::new();
        let key = Uuid::new_v4();

        let run = |msg: &'static str| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Err::<(), _>(Error::Storage(msg.to_string()))
        };

        let (a, b) = tokio::join!(
            registry.run_exclusive(key, run("first")),
            registry.run_exclusive(key, run("second")),
        );

        // The second producer never ran; both callers see the first error.
        assert_eq!(a, Err(Error::Storage("first".to_string())));
        assert_eq!(b, Err(Error::Storage("first".to_string())));
    }
}
