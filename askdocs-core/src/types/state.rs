//! Pipeline state record.
//!
//! One [`PipelineState`] value is owned exclusively by one pipeline
//! invocation and threaded through every stage. Each stage reads the
//! fields it requires and writes the fields it guarantees; nothing else
//! is shared between concurrent invocations.

use serde::{Deserialize, Serialize};

use super::{Document, TraceEntry};

/// The single mutable record threaded through the pipeline graph.
///
/// Field lifecycle:
/// - `original_query` is set once at entry and never overwritten, even when
///   retrieval internally chases a refined query. The generator must always
///   answer the user's original question.
/// - `active_query` is the query the grader evaluates against; refinement
///   replaces it, leaving `original_query` untouched.
/// - `retry_count` transitions 0 to 1 exactly once per run; the grader never
///   re-enters scoring after it reaches 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// The user's question, immutable after entry.
    pub original_query: String,

    /// The query currently driving retrieval; replaced on refinement.
    pub active_query: String,

    /// Search variants produced by the expander (1-3 entries).
    pub expanded_queries: Vec<String>,

    /// Deduplicated union of all per-query retrieval results.
    pub retrieved_documents: Vec<Document>,

    /// Top-N slice of `retrieved_documents` kept by the compactor.
    pub reranked_documents: Vec<Document>,

    /// Bounded context window assembled from the top reranked documents.
    pub context_text: String,

    /// Final generated answer, absent until the generator runs.
    pub answer_text: Option<String>,

    /// Refinement retry counter, 0 or 1.
    pub retry_count: u8,

    /// Append-only diagnostics channel; never influences control flow.
    pub trace_entries: Vec<TraceEntry>,
}

impl PipelineState {
    /// Create the entry state for one pipeline run.
    pub fn new<S: Into<String>>(query: S) -> Self {
        let query = query.into();
        Self {
            active_query: query.clone(),
            original_query: query,
            expanded_queries: Vec::new(),
            retrieved_documents: Vec::new(),
            reranked_documents: Vec::new(),
            context_text: String::new(),
            answer_text: None,
            retry_count: 0,
            trace_entries: Vec::new(),
        }
    }

    /// Append a trace entry.
    pub fn record(&mut self, entry: TraceEntry) {
        self.trace_entries.push(entry);
    }
}
