//! Relevance grading and query refinement stage.
//!
//! Scores the merged evidence against the user's question and, on a low
//! score, asks the LLM for a refined query and triggers exactly one
//! retrieval retry. The original query is never overwritten; only the
//! active search query changes.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use askdocs_core::{AskdocsError, ChatModel, Document, Result};

/// Score at or above which retrieved documents are considered relevant.
pub const RELEVANCE_THRESHOLD: f32 = 0.5;

/// Number of documents shown to the grader as a preview.
const PREVIEW_DOCS: usize = 3;

/// Characters of content shown per previewed document.
const PREVIEW_CHARS: usize = 80;

const GRADE_PROMPT: &str = "You are a grader evaluating whether retrieved documentation chunks are relevant to the user's question.

User question: {query}

First 3 retrieved chunk titles (preview):
{chunk_preview}

Answer in exactly 2 lines:
1. SCORE: a number from 0.00 to 1.00 (0.00=completely irrelevant, 1.00=perfectly relevant), exactly 2 decimal places
2. REFINED: if SCORE < 0.50, write an improved question that:
   - clarifies the user's intent
   - adds missing context
   - removes ambiguity
   - specifies attributes/details
   If SCORE >= 0.50, write the original question unchanged.

Example format:
SCORE: 0.35
REFINED: How to install Docker Engine on Ubuntu Linux step by step?";

/// Outcome of one grading pass, merged into the pipeline state by the
/// controller.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    /// New retry counter. 1 means the grader just requested a retry;
    /// 0 means proceed downstream (terminal for the refinement loop).
    pub retry_count: u8,

    /// Replacement active query, set only when a retry was requested.
    pub refined_query: Option<String>,

    /// Replacement query set for the retry pass: a single-element sequence
    /// containing the refined query, never the original 1-3 expansions.
    pub expanded_queries: Option<Vec<String>>,

    /// Parsed score, absent when grading was skipped.
    pub score: Option<f32>,
}

impl GradeOutcome {
    fn pass(score: Option<f32>) -> Self {
        Self {
            retry_count: 0,
            refined_query: None,
            expanded_queries: None,
            score,
        }
    }
}

/// Grades retrieval quality and refines the query on a failing score.
///
/// Skip condition: when there are no documents or a retry already
/// happened, grading is skipped entirely and the stage returns
/// `retry_count = 0`, terminating the refinement loop regardless of
/// quality. This bound, not an external loop counter, is what keeps the
/// retrieve-grade cycle to at most two passes.
#[derive(Debug)]
pub struct RelevanceGrader {
    llm: Arc<dyn ChatModel>,
}

impl RelevanceGrader {
    /// Create a new grader over the given chat model.
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }

    /// Identifier of the model this stage calls.
    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    /// Grade `documents` against `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Grading`] if the LLM call itself fails.
    /// An unparsable response body is not an error; the score defaults to
    /// a passing 0.5 and the refined query to the original.
    #[instrument(skip(self, documents), fields(stage = "grade", documents = documents.len()))]
    pub async fn grade(
        &self,
        query: &str,
        documents: &[Document],
        retry_count: u8,
    ) -> Result<GradeOutcome> {
        if documents.is_empty() || retry_count >= 1 {
            debug!("Skipping grading (documents = {}, retry_count = {retry_count})", documents.len());
            return Ok(GradeOutcome::pass(None));
        }

        let preview = build_preview(documents);
        let prompt = GRADE_PROMPT
            .replace("{query}", query)
            .replace("{chunk_preview}", &preview);

        let response = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AskdocsError::grading(format!("grading LLM call failed: {e}")))?;

        let (score, refined) = parse_grader_response(&response);
        if score >= RELEVANCE_THRESHOLD {
            info!("Documents accepted with score {score:.2}");
            return Ok(GradeOutcome::pass(Some(score)));
        }

        let refined = if refined.is_empty() {
            query.to_string()
        } else {
            refined
        };
        info!("Documents rejected with score {score:.2}, refined query: {refined:?}");
        Ok(GradeOutcome {
            retry_count: 1,
            expanded_queries: Some(vec![refined.clone()]),
            refined_query: Some(refined),
            score: Some(score),
        })
    }
}

/// Format the first [`PREVIEW_DOCS`] documents as `- title: content...`
/// lines for the grading prompt.
fn build_preview(documents: &[Document]) -> String {
    documents
        .iter()
        .take(PREVIEW_DOCS)
        .map(|d| {
            let snippet: String = d.content.chars().take(PREVIEW_CHARS).collect();
            format!("- {}: {snippet}...", d.title())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse `SCORE` and `REFINED` fields from a grader response.
///
/// Parsing is tolerant: either field may come first, the decimal separator
/// may be a comma, out-of-range scores clamp into [0, 1] and round to two
/// decimals, and a missing or unparsable score defaults to a passing 0.5.
/// A missing `REFINED` field yields an empty string.
pub fn parse_grader_response(response: &str) -> (f32, String) {
    let mut score = 0.5;
    let mut refined = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        let upper = trimmed.to_uppercase();
        if upper.starts_with("SCORE:") {
            if let Some(raw) = trimmed.split_once(':').map(|(_, rest)| rest) {
                let cleaned = raw.trim().trim_end_matches('.').replace(',', ".");
                if let Ok(value) = cleaned.parse::<f32>() {
                    score = (value.clamp(0.0, 1.0) * 100.0).round() / 100.0;
                }
            }
        } else if upper.starts_with("REFINED:") {
            if let Some(raw) = trimmed.split_once(':').map(|(_, rest)| rest) {
                refined = raw.trim().to_string();
            }
        }
    }

    (score, refined)
}
