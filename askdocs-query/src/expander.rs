//! Query expansion stage.
//!
//! Turns one user query into up to three alternative search phrasings that
//! preserve intent and add domain keywords, improving retrieval recall.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use askdocs_core::{AskdocsError, ChatModel, Result};

/// Maximum number of search variants kept from the LLM output.
pub const MAX_EXPANSIONS: usize = 3;

const EXPANSION_PROMPT: &str = "You are a query optimizer for a documentation search system.

Given the user query, produce 1-3 optimized search queries that will retrieve the most relevant documentation chunks.
- Keep the original intent
- Add technical keywords if helpful
- Use different phrasings to improve recall
- Output ONLY the queries, one per line, no numbering or bullets";

/// Expands a user query into search variants with an LLM.
///
/// An LLM failure here is fatal for the run; the expander is not inside
/// the refinement retry loop. A successful response that parses to zero
/// lines is not an error and falls back to the original query.
#[derive(Debug)]
pub struct QueryExpander {
    llm: Arc<dyn ChatModel>,
}

impl QueryExpander {
    /// Create a new expander over the given chat model.
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Identifier of the model this stage calls.
    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    /// Expand `query` into 1-3 non-empty search variants.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Expansion`] if the LLM call fails.
    #[instrument(skip(self), fields(stage = "expand"))]
    pub async fn expand(&self, query: &str) -> Result<Vec<String>> {
        debug!("Expanding query: {query}");

        let prompt = format!("{EXPANSION_PROMPT}\n\nUser query: {query}");
        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AskdocsError::expansion(format!("expansion LLM call failed: {e}")))?;

        let queries = parse_expansion(&response, query);
        info!("Expanded into {} search queries", queries.len());
        Ok(queries)
    }
}

/// Parse LLM output into trimmed, non-empty lines, capped at
/// [`MAX_EXPANSIONS`]. Zero parsed lines fall back to `[original]` so the
/// retrieval stage never receives an empty query set.
fn parse_expansion(response: &str, original: &str) -> Vec<String> {
    let lines: Vec<String> = response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_EXPANSIONS)
        .map(ToString::to_string)
        .collect();

    if lines.is_empty() {
        vec![original.to_string()]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_lines() {
        let queries = parse_expansion(
            "docker volume persistence\nbind mounts vs volumes\n",
            "How to persist data?",
        );
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], "docker volume persistence");
    }

    #[test]
    fn test_parse_caps_at_three() {
        let queries = parse_expansion("a\nb\nc\nd\ne", "q");
        assert_eq!(queries.len(), MAX_EXPANSIONS);
        assert_eq!(queries, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let queries = parse_expansion("\n  first  \n\n second \n", "q");
        assert_eq!(queries, vec!["first", "second"]);
    }

    #[test]
    fn test_parse_empty_output_falls_back_to_original() {
        let queries = parse_expansion("   \n\n", "How to persist data?");
        assert_eq!(queries, vec!["How to persist data?"]);
    }
}
