//! Pipeline controller.
//!
//! Drives the stages as an explicit finite-state machine with an enum of
//! named states and a transition function. The only conditional edge is
//! Grade back to Retrieve, taken exactly when the grader just requested a
//! refinement retry; every other edge is an unconditional forward edge.

use std::sync::Arc;

use tracing::{info, instrument};

use askdocs_core::{
    AskdocsError, ChatModel, DocSearcher, PipelineState, Result, TraceEntry,
    config::RetrievalConfig,
};

use crate::compactor::compact;
use crate::expander::QueryExpander;
use crate::generator::AnswerGenerator;
use crate::grader::RelevanceGrader;
use crate::report;
use crate::retriever::FanoutRetriever;

/// Named states of the pipeline graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Expand the user query into search variants.
    Expand,
    /// Fan the variants out to the search handle and merge results.
    Retrieve,
    /// Score the merged evidence; possibly refine the query once.
    Grade,
    /// Truncate the evidence into a bounded context window.
    Compact,
    /// Generate the grounded answer. Terminal state.
    Generate,
}

impl Stage {
    /// Stage name as recorded in trace entries.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Expand => "expand",
            Self::Retrieve => "retrieve",
            Self::Grade => "grade",
            Self::Compact => "compact",
            Self::Generate => "generate",
        }
    }
}

/// Transition function of the pipeline state machine.
///
/// Grade routes back to Retrieve iff the grader just set `retry_count` to
/// 1; the grader's own skip condition (`retry_count >= 1`) is what bounds
/// the cycle to a single retry.
#[must_use]
pub fn next_stage(stage: Stage, state: &PipelineState) -> Option<Stage> {
    match stage {
        Stage::Expand => Some(Stage::Retrieve),
        Stage::Retrieve => Some(Stage::Grade),
        Stage::Grade => {
            if state.retry_count == 1 {
                Some(Stage::Retrieve)
            } else {
                Some(Stage::Compact)
            }
        }
        Stage::Compact => Some(Stage::Generate),
        Stage::Generate => None,
    }
}

/// The staged RAG pipeline.
///
/// Owns one instance of every stage; each invocation of [`RagPipeline::run`]
/// owns its [`PipelineState`] exclusively, so concurrent invocations share
/// only the read-only searcher handle.
#[derive(Debug)]
pub struct RagPipeline {
    expander: QueryExpander,
    retriever: FanoutRetriever,
    grader: RelevanceGrader,
    generator: AnswerGenerator,
}

impl RagPipeline {
    /// Create a pipeline from its collaborators with default retrieval
    /// settings.
    pub fn new(
        searcher: Arc<dyn DocSearcher>,
        smart_llm: Arc<dyn ChatModel>,
        grader_llm: Arc<dyn ChatModel>,
    ) -> Self {
        Self::with_config(searcher, smart_llm, grader_llm, RetrievalConfig::default())
    }

    /// Create a pipeline with custom retrieval settings.
    pub fn with_config(
        searcher: Arc<dyn DocSearcher>,
        smart_llm: Arc<dyn ChatModel>,
        grader_llm: Arc<dyn ChatModel>,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            expander: QueryExpander::new(Arc::clone(&smart_llm)),
            retriever: FanoutRetriever::with_config(searcher, retrieval),
            grader: RelevanceGrader::new(grader_llm),
            generator: AnswerGenerator::new(smart_llm),
        }
    }

    /// Create a builder for constructing pipelines.
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::new()
    }

    /// Run the full pipeline for one query and return the final state.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Validation`] for an empty query, or the
    /// fatal error of whichever stage aborted the run. The caller never
    /// receives a partial or silently-degraded answer.
    #[instrument(skip(self), fields(pipeline = "RagPipeline"))]
    pub async fn run(&self, query: &str) -> Result<PipelineState> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AskdocsError::validation("query must not be empty"));
        }

        info!("Running pipeline for query: {query}");
        let mut state = PipelineState::new(query);
        let mut stage = Stage::Expand;

        loop {
            self.execute(stage, &mut state).await?;
            match next_stage(stage, &state) {
                Some(next) => stage = next,
                None => break,
            }
        }

        info!("Pipeline completed with {} trace entries", state.trace_entries.len());
        Ok(state)
    }

    /// Run the pipeline and return the answer text.
    pub async fn ask(&self, query: &str) -> Result<String> {
        let state = self.run(query).await?;
        Ok(state.answer_text.unwrap_or_default())
    }

    /// Run the pipeline and return two human-readable report documents:
    /// the answer document and the execution trace document.
    pub async fn ask_with_trace(&self, query: &str) -> Result<(String, String)> {
        let state = self.run(query).await?;
        Ok((report::answer_document(&state), report::trace_document(&state)))
    }

    /// Check the pipeline's search backend.
    pub async fn health_check(&self) -> Result<()> {
        self.retriever.health_check().await
    }

    async fn execute(&self, stage: Stage, state: &mut PipelineState) -> Result<()> {
        match stage {
            Stage::Expand => {
                let queries = self.expander.expand(&state.original_query).await?;
                state.record(
                    TraceEntry::new(stage.name(), format!("expanded into {} queries", queries.len()))
                        .with_model(self.expander.model_id())
                        .with_call_count(1),
                );
                state.expanded_queries = queries;
            }
            Stage::Retrieve => {
                let dispatched = state.expanded_queries.len();
                let documents = self.retriever.retrieve(&state.expanded_queries).await?;
                state.record(
                    TraceEntry::new(
                        stage.name(),
                        format!("merged {} documents from {dispatched} queries", documents.len()),
                    )
                    .with_call_count(dispatched),
                );
                state.retrieved_documents = documents;
            }
            Stage::Grade => {
                let outcome = self
                    .grader
                    .grade(&state.active_query, &state.retrieved_documents, state.retry_count)
                    .await?;

                let entry = match outcome.score {
                    Some(score) if outcome.retry_count == 1 => {
                        TraceEntry::new(stage.name(), format!("score {score:.2}, refining query"))
                            .with_model(self.grader.model_id())
                            .with_call_count(1)
                    }
                    Some(score) => {
                        TraceEntry::new(stage.name(), format!("score {score:.2}, documents accepted"))
                            .with_model(self.grader.model_id())
                            .with_call_count(1)
                    }
                    None => TraceEntry::new(stage.name(), "skipped (no documents or retry spent)"),
                };
                state.record(entry);

                state.retry_count = outcome.retry_count;
                if let Some(refined) = outcome.refined_query {
                    state.active_query = refined;
                }
                if let Some(queries) = outcome.expanded_queries {
                    state.expanded_queries = queries;
                }
            }
            Stage::Compact => {
                let compacted = compact(&state.retrieved_documents);
                state.record(TraceEntry::new(
                    stage.name(),
                    format!(
                        "kept {} documents, {} context characters",
                        compacted.reranked_documents.len(),
                        compacted.context_text.len()
                    ),
                ));
                state.reranked_documents = compacted.reranked_documents;
                state.context_text = compacted.context_text;
            }
            Stage::Generate => {
                let answer = self
                    .generator
                    .generate(&state.context_text, &state.original_query)
                    .await?;
                state.record(
                    TraceEntry::new(stage.name(), format!("answer with {} characters", answer.len()))
                        .with_model(self.generator.model_id())
                        .with_call_count(1),
                );
                state.answer_text = Some(answer);
            }
        }
        Ok(())
    }
}

/// Builder for creating pipelines.
#[derive(Debug, Default)]
pub struct RagPipelineBuilder {
    searcher: Option<Arc<dyn DocSearcher>>,
    smart_llm: Option<Arc<dyn ChatModel>>,
    grader_llm: Option<Arc<dyn ChatModel>>,
    retrieval: Option<RetrievalConfig>,
}

impl RagPipelineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared searcher handle.
    #[must_use]
    pub fn searcher(mut self, searcher: Arc<dyn DocSearcher>) -> Self {
        self.searcher = Some(searcher);
        self
    }

    /// Set the chat model used for expansion and generation.
    #[must_use]
    pub fn smart_llm(mut self, llm: Arc<dyn ChatModel>) -> Self {
        self.smart_llm = Some(llm);
        self
    }

    /// Set the chat model used for relevance grading.
    #[must_use]
    pub fn grader_llm(mut self, llm: Arc<dyn ChatModel>) -> Self {
        self.grader_llm = Some(llm);
        self
    }

    /// Set the retrieval stage configuration.
    #[must_use]
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = Some(retrieval);
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`AskdocsError::Configuration`] when a collaborator is
    /// missing.
    pub fn build(self) -> Result<RagPipeline> {
        let searcher = self
            .searcher
            .ok_or_else(|| AskdocsError::configuration("searcher is required"))?;
        let smart_llm = self
            .smart_llm
            .ok_or_else(|| AskdocsError::configuration("smart LLM is required"))?;
        let grader_llm = self
            .grader_llm
            .ok_or_else(|| AskdocsError::configuration("grader LLM is required"))?;
        let retrieval = self.retrieval.unwrap_or_default();

        Ok(RagPipeline::with_config(searcher, smart_llm, grader_llm, retrieval))
    }
}
