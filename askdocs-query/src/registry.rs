//! Process-wide shared searcher handle.
//!
//! The vector-index handle (and whatever connection or embedding client it
//! wraps) is constructed lazily exactly once and shared read-only across
//! the process's lifetime. The registry owns the slot; the pipeline
//! receives the handle by injection rather than through import-time
//! global mutation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use askdocs_core::{DocSearcher, Result};

/// Lazily-initialized, shared [`DocSearcher`] slot.
///
/// Concurrent first accesses are guarded against double construction:
/// exactly one caller runs the factory, the rest await the same cell.
///
/// # Examples
///
/// ```rust,no_run
/// use askdocs_query::registry::SearcherRegistry;
/// use std::sync::Arc;
///
/// # async fn example() -> askdocs_core::Result<()> {
/// # async fn open_index() -> askdocs_core::Result<Arc<dyn askdocs_core::DocSearcher>> { unimplemented!() }
/// let registry = SearcherRegistry::new();
/// let searcher = registry.get_or_try_init(open_index).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SearcherRegistry {
    cell: OnceCell<Arc<dyn DocSearcher>>,
}

impl SearcherRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Get the shared handle, constructing it with `factory` on first use.
    ///
    /// # Errors
    ///
    /// Propagates the factory's error; a failed construction leaves the
    /// slot empty so a later call can try again.
    pub async fn get_or_try_init<F, Fut>(&self, factory: F) -> Result<Arc<dyn DocSearcher>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn DocSearcher>>>,
    {
        let searcher = self
            .cell
            .get_or_try_init(|| async {
                debug!("Constructing shared searcher handle");
                factory().await
            })
            .await?;
        Ok(Arc::clone(searcher))
    }

    /// Get the handle if it has already been constructed.
    pub fn get(&self) -> Option<Arc<dyn DocSearcher>> {
        self.cell.get().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdocs_core::{Document, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct NullSearcher;

    #[async_trait]
    impl DocSearcher for NullSearcher {
        async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<Document>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_factory_runs_once_across_concurrent_access() {
        static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);
        let registry = Arc::new(SearcherRegistry::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry
                        .get_or_try_init(|| async {
                            CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
                            Ok(Arc::new(NullSearcher) as Arc<dyn DocSearcher>)
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
        assert!(registry.get().is_some());
    }

    #[tokio::test]
    async fn test_failed_construction_leaves_slot_empty() {
        let registry = SearcherRegistry::new();
        let result = registry
            .get_or_try_init(|| async { Err(askdocs_core::AskdocsError::vector_store("down")) })
            .await;
        assert!(result.is_err());
        assert!(registry.get().is_none());
    }
}
