//! Vector search capability.

use async_trait::async_trait;

use crate::{Result, types::Document};

/// Embeds a query and searches the vector index for similar chunks.
///
/// Implementations must be safe for concurrent use from multiple call
/// sites: the retrieval stage issues several `search` calls at once
/// against one shared handle. Index building is out of scope; an
/// implementation loads an existing persisted index.
///
/// # Examples
///
/// ```rust,no_run
/// use askdocs_core::traits::DocSearcher;
/// use askdocs_core::{Result, types::Document};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct EmptySearcher;
///
/// #[async_trait]
/// impl DocSearcher for EmptySearcher {
///     async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<Document>> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait DocSearcher: Send + Sync + std::fmt::Debug {
    /// Embed `query` and return the `top_k` most similar documents,
    /// ordered by descending similarity.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or the index lookup fails. The
    /// retrieval stage tolerates individual failures; only a run where
    /// every query fails aborts.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Document>>;

    /// Get a human-readable name for this searcher.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Check if the searcher is healthy and ready to serve queries.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
