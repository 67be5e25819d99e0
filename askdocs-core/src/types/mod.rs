//! Core data types for the askdocs pipeline.
//!
//! This module defines the retrieval unit ([`Document`]), the single state
//! record threaded through the pipeline graph ([`PipelineState`]), and the
//! append-only diagnostics channel ([`TraceEntry`]).

pub mod document;
pub mod state;
pub mod trace;

pub use document::{Document, FINGERPRINT_PREFIX_CHARS};
pub use state::PipelineState;
pub use trace::TraceEntry;
