//! Staged RAG orchestration for the askdocs pipeline.
//!
//! This crate wires the retrieval-augmented generation workflow into a
//! small state machine with one conditional back-edge:
//!
//! ```text
//! Expand → Retrieve → Grade ─┬→ Compact → Generate
//!             ↑              │
//!             └── refined ───┘   (at most one retry)
//! ```
//!
//! - **Expander** turns one user query into up to three search variants
//! - **Retriever** fans the variants out to a shared vector search handle
//!   concurrently, then merges and deduplicates in completion order
//! - **Grader** scores the merged evidence against the query; on a low
//!   score it refines the query and triggers exactly one retry
//! - **Compactor** truncates the evidence into a bounded context window
//! - **Generator** produces the grounded answer from context plus the
//!   user's original question
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use askdocs_query::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(searcher: Arc<dyn askdocs_core::DocSearcher>,
//! #                  smart: Arc<dyn askdocs_core::ChatModel>,
//! #                  grader: Arc<dyn askdocs_core::ChatModel>) -> askdocs_core::Result<()> {
//! let pipeline = RagPipeline::builder()
//!     .searcher(searcher)
//!     .smart_llm(smart)
//!     .grader_llm(grader)
//!     .build()?;
//!
//! let answer = pipeline.ask("How can I persist data in Docker containers?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compactor;
pub mod expander;
pub mod generator;
pub mod grader;
pub mod llm;
pub mod machine;
pub mod registry;
pub mod report;
pub mod retriever;

/// Re-export commonly used types and traits.
pub mod prelude {
    pub use crate::compactor::{CONTEXT_KEEP, RERANK_KEEP, compact};
    pub use crate::expander::QueryExpander;
    pub use crate::generator::AnswerGenerator;
    pub use crate::grader::{RELEVANCE_THRESHOLD, RelevanceGrader};
    pub use crate::llm::SiumaiChatModel;
    pub use crate::machine::{RagPipeline, RagPipelineBuilder, Stage};
    pub use crate::registry::SearcherRegistry;
    pub use crate::retriever::{FanoutConfig, FanoutRetriever};

    // Re-export core types
    pub use askdocs_core::{
        AskdocsError, ChatModel, DocSearcher, Document, PipelineState, Result, TraceEntry,
    };
}
