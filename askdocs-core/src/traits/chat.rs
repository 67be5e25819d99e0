//! LLM completion capability.

use async_trait::async_trait;

use crate::Result;

/// Completes a single-turn prompt with an LLM.
///
/// The pipeline calls chat models with temperature 0 so grading and
/// generation behave deterministically; the temperature is part of the
/// client construction, not this interface.
///
/// Each stage wraps transport failures into its own error variant, so
/// implementations should surface errors as
/// [`AskdocsError::Llm`](crate::AskdocsError::Llm).
#[async_trait]
pub trait ChatModel: Send + Sync + std::fmt::Debug {
    /// Send one user prompt and return the response content verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion call fails or the provider
    /// returns a non-text payload.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Identifier of the underlying model (e.g. `"deepseek/deepseek-chat"`).
    fn model_id(&self) -> &str;
}
