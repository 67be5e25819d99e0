//! Answer generation stage.
//!
//! Produces the final grounded answer from the assembled context and the
//! user's original question. The answer is the LLM response content
//! verbatim; even a whitespace-only answer is a valid, if degenerate,
//! output.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use askdocs_core::{AskdocsError, ChatModel, Result};

const GENERATION_PROMPT: &str = "You are a helpful documentation assistant. Answer the user's question based ONLY on the provided context.

If the context does NOT contain the exact information asked for:
1. Clearly state that such information is not in the documentation.
2. Suggest the closest related information from the context (e.g. \"The closest match:\").

If the context contains relevant information, answer concisely and technically.

Context:
{context}

User question: {query}

Answer:";

/// Generates the grounded answer with an LLM.
///
/// Always receives the original query, never the refined one: the final
/// answer must address the user's original intent even when retrieval
/// internally chased a refined query. An LLM failure here is fatal to the
/// run, with no retry.
#[derive(Debug)]
pub struct AnswerGenerator {
    llm: Arc<dyn ChatModel>,
}

impl AnswerGenerator {
    /// Create a new generator over the given chat model.
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Identifier of the model this stage calls.
    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    /// Generate the answer for `query` from `context`.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Generation`] if the LLM call fails.
    #[instrument(skip(self, context), fields(stage = "generate", context_chars = context.len()))]
    pub async fn generate(&self, context: &str, query: &str) -> Result<String> {
        debug!("Generating answer for query: {query}");

        let prompt = GENERATION_PROMPT
            .replace("{context}", context)
            .replace("{query}", query);

        let answer = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AskdocsError::generation(format!("generation LLM call failed: {e}")))?;

        info!("Generated answer with {} characters", answer.len());
        Ok(answer)
    }
}
