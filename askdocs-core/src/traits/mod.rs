//! Capability traits consumed by the pipeline.
//!
//! The pipeline treats its external collaborators as opaque capabilities:
//! a thread-safe vector search handle and an LLM completion client. The
//! traits here are the seams where concrete backends plug in.

pub mod chat;
pub mod searcher;

pub use chat::ChatModel;
pub use searcher::DocSearcher;
