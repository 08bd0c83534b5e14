//! Bounded worker pool for per-page fan-out
//!
//! This module handles:
//! - Running one task per item with a global concurrency cap (semaphore)
//! - Collecting results in completion order
//! - Isolating failures so one task never affects its siblings

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs a worker over a batch of items with at most `max_concurrency` in flight
///
/// Each call to [`WorkerPool::run_all`] waits for every spawned task before
/// returning, so no work from one batch overlaps the next.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    max_concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool; a cap of zero is raised to one
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Runs `worker` on every item and returns the `Some` results
    ///
    /// Results are in completion order, not input order. A worker returning
    /// `None` or a panicking task contributes nothing; the pool itself never
    /// fails. Tasks are only spawned once a permit is available, so at most
    /// `max_concurrency` of them exist at any time.
    pub async fn run_all<T, R, F, Fut>(&self, items: Vec<T>, worker: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<R>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let worker = Arc::new(worker);
        let mut tasks = JoinSet::new();
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let worker = Arc::clone(&worker);
            tasks.spawn(async move {
                let result = (*worker)(item).await;
                drop(permit);
                result
            });

            // Collect whatever already finished so results stay in completion order
            while let Some(joined) = tasks.try_join_next() {
                collect(joined, &mut results);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            collect(joined, &mut results);
        }

        results
    }
}

fn collect<R>(joined: Result<Option<R>, tokio::task::JoinError>, results: &mut Vec<R>) {
    match joined {
        Ok(Some(result)) => results.push(result),
        Ok(None) => {}
        Err(e) => tracing::error!("Worker task failed: {}", e),
    }
}
