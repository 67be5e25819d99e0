//! Execution trace entries.

use serde::{Deserialize, Serialize};

/// One stage execution in the diagnostics trace.
///
/// Entries are append-only and reconstruct a human-readable execution
/// trace; they never influence control flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceEntry {
    /// Name of the stage that ran (e.g. `"expand"`, `"retrieve"`).
    pub stage_name: String,

    /// Model identifier used by the stage, if it called an LLM.
    pub model_used: Option<String>,

    /// Number of external calls the stage made.
    pub call_count: usize,

    /// Free-text detail about what the stage did.
    pub detail_message: String,
}

impl TraceEntry {
    /// Create a new trace entry for a stage that made no external calls.
    pub fn new<S1: Into<String>, S2: Into<String>>(stage_name: S1, detail: S2) -> Self {
        Self {
            stage_name: stage_name.into(),
            model_used: None,
            call_count: 0,
            detail_message: detail.into(),
        }
    }

    /// Set the model used by the stage.
    #[must_use]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model_used = Some(model.into());
        self
    }

    /// Set the number of external calls the stage made.
    #[must_use]
    pub fn with_call_count(mut self, count: usize) -> Self {
        self.call_count = count;
        self
    }
}
