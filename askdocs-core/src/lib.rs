//! # Askdocs Core
//!
//! Core traits, types, and interfaces for the askdocs staged RAG
//! (Retrieval-Augmented Generation) pipeline.
//!
//! This crate provides the foundational building blocks shared by the
//! pipeline crate:
//!
//! - **Data structures**: `Document`, `PipelineState`, and `TraceEntry` types
//! - **Capability traits**: [`DocSearcher`] for vector search and
//!   [`ChatModel`] for LLM completion, both consumed as opaque collaborators
//! - **Configuration**: Type-safe configuration structures read at process start
//! - **Error handling**: One error taxonomy covering every pipeline stage
//!
//! ## Quick Start
//!
//! ```rust
//! use askdocs_core::types::Document;
//!
//! let doc = Document::new("docker volume create my-vol")
//!     .with_metadata("title", "Volumes");
//! assert_eq!(doc.title(), "Volumes");
//! ```
//!
//! ## Architecture
//!
//! The pipeline crate drives a small state machine over these types:
//!
//! - **Expander** turns one user query into up to three search variants
//! - **Retriever** fans variants out to a [`DocSearcher`] concurrently
//! - **Grader** scores the merged evidence and may refine the query once
//! - **Compactor** truncates the evidence into a bounded context window
//! - **Generator** produces the grounded answer from context plus query

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{AskdocsError, Result};
pub use types::{Document, PipelineState, TraceEntry};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the askdocs core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the askdocs core library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
