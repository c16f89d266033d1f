//! # Memoizing Resolver
//!
//! Loading a circuit is the expensive step of every proof operation, so
//! resolved artifacts are kept per `(project, depth)` for the life of the
//! cache.
//!
//! ## Concurrency
//!
//! The slot map sits behind a `parking_lot::Mutex` that is held only to look
//! up or insert a slot, never across an `.await`. Each slot is a
//! `tokio::sync::OnceCell`: concurrent first requests for one key wait on a
//! single load, later requests read the populated cell without waiting.
//! A failed load leaves the cell empty, so errors are not cached and the
//! next request retries. Readers only ever see a fully constructed
//! artifact.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::artifact::CircuitArtifact;
use crate::error::ArtifactError;
use crate::resolver::ArtifactResolver;

type Slot = Arc<OnceCell<Arc<CircuitArtifact>>>;

/// Wraps a resolver with per-key memoization.
#[derive(Debug)]
pub struct CachedResolver<R> {
    inner: R,
    slots: Mutex<HashMap<(String, u32), Slot>>,
}

impl<R> CachedResolver<R> {
    /// Memoize `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped resolver.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of keys with a loaded artifact.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, project: &str, depth: u32) -> Slot {
        self.slots
            .lock()
            .entry((project.to_string(), depth))
            .or_default()
            .clone()
    }
}

impl<R: ArtifactResolver> ArtifactResolver for CachedResolver<R> {
    async fn resolve(
        &self,
        project: &str,
        depth: u32,
    ) -> Result<Arc<CircuitArtifact>, ArtifactError> {
        let slot = self.slot(project, depth);
        if let Some(artifact) = slot.get() {
            tracing::debug!(project, depth, "artifact cache hit");
            return Ok(Arc::clone(artifact));
        }

        let artifact = slot
            .get_or_try_init(|| async {
                tracing::debug!(project, depth, "artifact cache miss");
                self.inner.resolve(project, depth).await
            })
            .await?;
        Ok(Arc::clone(artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts loads; fails while `failures` is positive.
    #[derive(Default)]
    struct CountingResolver {
        loads: AtomicUsize,
        failures: AtomicUsize,
    }

    impl ArtifactResolver for CountingResolver {
        async fn resolve(
            &self,
            project: &str,
            depth: u32,
        ) -> Result<Arc<CircuitArtifact>, ArtifactError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ArtifactError::NotFound {
                    project: project.to_string(),
                    depth,
                });
            }
            Ok(Arc::new(CircuitArtifact::new(
                project,
                depth,
                format!("circuit-{depth}").into_bytes(),
            )))
        }
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let cache = CachedResolver::new(CountingResolver::default());
        let a = cache.resolve("p", 20).await.unwrap();
        let b = cache.resolve("p", 20).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.inner().loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_requests_load_once() {
        let cache = Arc::new(CachedResolver::new(CountingResolver::default()));
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.resolve("p", 7).await })
            })
            .collect();

        let mut artifacts = Vec::new();
        for task in tasks {
            artifacts.push(task.await.unwrap().unwrap());
        }
        assert_eq!(cache.inner().loads.load(Ordering::SeqCst), 1);
        assert!(artifacts.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_depths_are_cached_independently() {
        let cache = CachedResolver::new(CountingResolver::default());
        let a = cache.resolve("p", 1).await.unwrap();
        let b = cache.resolve("p", 2).await.unwrap();
        assert_ne!(a.bytecode, b.bytecode);
        assert_eq!(b.depth, 2);
        assert_eq!(cache.inner().loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = CountingResolver::default();
        inner.failures.store(1, Ordering::SeqCst);
        let cache = CachedResolver::new(inner);

        assert!(cache.resolve("p", 5).await.is_err());
        assert!(cache.is_empty());
        assert!(cache.resolve("p", 5).await.is_ok());
        assert_eq!(cache.inner().loads.load(Ordering::SeqCst), 2);
    }
}
