//! Concurrent retrieval stage.
//!
//! Fans expanded queries out to one shared vector search handle, joins on
//! every call, then merges results in completion order with first-seen-wins
//! deduplication on a content fingerprint.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, instrument, warn};

use askdocs_core::{AskdocsError, DocSearcher, Document, Result, config::RetrievalConfig};

/// Configuration for the fan-out retrieval stage.
pub type FanoutConfig = RetrievalConfig;

/// Retrieves documents for a set of search queries concurrently.
///
/// Concurrency is capped at `min(number_of_queries, max_concurrency)`;
/// the stage blocks until every dispatched call has completed or failed,
/// so no partial results leak forward. Merge order is a function of
/// completion order, which is nondeterministic by design; only the
/// deduplication is deterministic.
#[derive(Debug)]
pub struct FanoutRetriever {
    searcher: Arc<dyn DocSearcher>,
    config: FanoutConfig,
}

impl FanoutRetriever {
    /// Create a new retriever over the given shared search handle.
    pub fn new(searcher: Arc<dyn DocSearcher>) -> Self {
        Self {
            searcher,
            config: FanoutConfig::default(),
        }
    }

    /// Create a new retriever with custom configuration.
    pub fn with_config(searcher: Arc<dyn DocSearcher>, config: FanoutConfig) -> Self {
        Self { searcher, config }
    }

    /// Number of documents requested per query.
    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    /// Fan `queries` out to the search handle and merge the results.
    ///
    /// A failed per-query call contributes nothing; the stage fails only
    /// when every query fails.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Retrieval`] when all per-query calls fail.
    #[instrument(skip(self, queries), fields(stage = "retrieve", queries = queries.len()))]
    pub async fn retrieve(&self, queries: &[String]) -> Result<Vec<Document>> {
        if queries.is_empty() {
            return Err(AskdocsError::retrieval("no search queries to dispatch"));
        }

        let concurrency = queries.len().min(self.config.max_concurrency);
        debug!("Dispatching {} queries with concurrency {concurrency}", queries.len());

        let mut in_flight = futures::stream::iter(queries.iter().cloned().map(|query| {
            let searcher = Arc::clone(&self.searcher);
            let top_k = self.config.top_k;
            async move {
                let result = searcher.search(&query, top_k).await;
                (query, result)
            }
        }))
        .buffer_unordered(concurrency);

        let mut seen: HashSet<u64> = HashSet::new();
        let mut merged: Vec<Document> = Vec::new();
        let mut failures = 0usize;

        // Completion order, not submission order: buffer_unordered yields
        // whichever search call finishes first.
        while let Some((query, result)) = in_flight.next().await {
            match result {
                Ok(documents) => {
                    for document in documents {
                        if seen.insert(document.fingerprint()) {
                            merged.push(document);
                        }
                    }
                }
                Err(e) => {
                    warn!("Search failed for query {query:?}: {e}");
                    failures += 1;
                }
            }
        }

        if failures == queries.len() {
            return Err(AskdocsError::retrieval(format!(
                "all {failures} search queries failed"
            )));
        }

        info!("Merged {} deduplicated documents", merged.len());
        Ok(merged)
    }

    /// Check the underlying search handle.
    pub async fn health_check(&self) -> Result<()> {
        self.searcher.health_check().await
    }
}
