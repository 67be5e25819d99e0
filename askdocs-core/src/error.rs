//! Error types for the askdocs pipeline.
//!
//! This module provides context-aware error types covering every stage of
//! the RAG pipeline, from query expansion through answer generation.

use thiserror::Error;

/// Core error types for the askdocs pipeline.
///
/// Each LLM-backed stage has its own variant so a caller can tell which
/// stage aborted the run. All fatal conditions propagate unmodified to the
/// pipeline's single caller; there is no per-stage local recovery beyond
/// the documented defaulting behavior in response parsing.
#[derive(Error, Debug)]
pub enum AskdocsError {
    /// I/O related errors (file reading, network operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query expansion errors. Fatal: the expander is not in the retry loop.
    #[error("Expansion error: {message}")]
    Expansion {
        /// Detailed error message
        message: String,
    },

    /// Retrieval errors. Raised only when every per-query search call fails;
    /// individual failures are tolerated as empty contributions.
    #[error("Retrieval error: {message}")]
    Retrieval {
        /// Detailed error message
        message: String,
    },

    /// Grading errors. A grader transport failure is not masked; only a
    /// successfully-returned-but-unparsable response body defaults to pass.
    #[error("Grading error: {message}")]
    Grading {
        /// Detailed error message
        message: String,
    },

    /// Answer generation errors. Fatal, no retry.
    #[error("Generation error: {message}")]
    Generation {
        /// Detailed error message
        message: String,
    },

    /// LLM transport errors not yet attributed to a stage.
    #[error("LLM error: {message}")]
    Llm {
        /// Detailed error message
        message: String,
    },

    /// Vector store / search backend errors for a single call.
    #[error("Vector store error: {message}")]
    VectorStore {
        /// Detailed error message
        message: String,
    },

    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {message}")]
    Validation {
        /// Detailed error message
        message: String,
    },

    /// Generic errors from external dependencies
    #[error("External error: {source}")]
    External {
        /// The underlying error
        #[source]
        source: anyhow::Error,
    },
}

impl AskdocsError {
    /// Create a new expansion error with a message.
    pub fn expansion<S: Into<String>>(message: S) -> Self {
        Self::Expansion {
            message: message.into(),
        }
    }

    /// Create a new retrieval error with a message.
    pub fn retrieval<S: Into<String>>(message: S) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    /// Create a new grading error with a message.
    pub fn grading<S: Into<String>>(message: S) -> Self {
        Self::Grading {
            message: message.into(),
        }
    }

    /// Create a new generation error with a message.
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a new LLM transport error with a message.
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// Create a new vector store error with a message.
    pub fn vector_store<S: Into<String>>(message: S) -> Self {
        Self::VectorStore {
            message: message.into(),
        }
    }

    /// Create a new configuration error with a message.
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error with a message.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new external error from any error that implements `Into<anyhow::Error>`.
    pub fn external<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::External {
            source: error.into(),
        }
    }

    /// Check if this error aborted an LLM-backed stage.
    ///
    /// Returns `true` for expansion, grading, generation, and raw LLM
    /// transport failures.
    #[must_use]
    pub fn is_llm_error(&self) -> bool {
        matches!(
            self,
            Self::Expansion { .. } | Self::Grading { .. } | Self::Generation { .. } | Self::Llm { .. }
        )
    }

    /// Check if this error is a client error (invalid input or configuration).
    ///
    /// Returns `true` for errors that won't be fixed by retrying.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Configuration { .. })
    }
}

/// Convert from `anyhow::Error` to `AskdocsError`.
impl From<anyhow::Error> for AskdocsError {
    fn from(error: anyhow::Error) -> Self {
        Self::External { source: error }
    }
}

/// Result type alias for convenience.
///
/// This is the standard result type used throughout the askdocs pipeline.
pub type Result<T> = std::result::Result<T, AskdocsError>;
