//! End-to-end tests for the staged RAG pipeline, run against mock
//! collaborators only (no network, no real models).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use askdocs_core::{AskdocsError, ChatModel, DocSearcher, Document, Result};
use askdocs_query::prelude::*;

/// Searcher that always returns the same documents and counts calls.
#[derive(Debug)]
struct FixedSearcher {
    documents: Vec<Document>,
    calls: AtomicUsize,
}

impl FixedSearcher {
    fn new(documents: Vec<Document>) -> Arc<Self> {
        Arc::new(Self {
            documents,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl DocSearcher for FixedSearcher {
    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents.clone())
    }
}

/// Chat model that answers expansion and generation prompts from a script
/// and counts completions.
#[derive(Debug)]
struct ScriptedSmartModel {
    expansion: &'static str,
    answer: &'static str,
    calls: AtomicUsize,
}

impl ScriptedSmartModel {
    fn new(expansion: &'static str, answer: &'static str) -> Arc<Self> {
        Arc::new(Self {
            expansion,
            answer,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatModel for ScriptedSmartModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.starts_with("You are a query optimizer") {
            Ok(self.expansion.to_string())
        } else {
            Ok(self.answer.to_string())
        }
    }

    fn model_id(&self) -> &str {
        "mock/smart"
    }
}

/// Grader model returning a fixed response, counting completions.
#[derive(Debug)]
struct FixedGraderModel {
    response: &'static str,
    calls: AtomicUsize,
}

impl FixedGraderModel {
    fn new(response: &'static str) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatModel for FixedGraderModel {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.to_string())
    }

    fn model_id(&self) -> &str {
        "mock/grader"
    }
}

fn volumes_corpus() -> Vec<Document> {
    vec![
        Document::new("docker volume create my-vol mounts persistent storage")
            .with_metadata("title", "Volumes")
            .with_metadata("source", "storage/volumes.md"),
        Document::new("Bind mounts map a host path into the container")
            .with_metadata("title", "Bind mounts"),
    ]
}

fn build_pipeline(
    searcher: Arc<FixedSearcher>,
    smart: Arc<ScriptedSmartModel>,
    grader: Arc<FixedGraderModel>,
) -> RagPipeline {
    RagPipeline::builder()
        .searcher(searcher)
        .smart_llm(smart)
        .grader_llm(grader)
        .build()
        .unwrap()
}

#[tokio::test]
async fn accepted_documents_complete_in_a_single_retrieval_pass() {
    let searcher = FixedSearcher::new(volumes_corpus());
    let smart = ScriptedSmartModel::new(
        "docker volume persistence\nbind mounts vs volumes",
        "Use docker volume create to persist data.",
    );
    let grader = FixedGraderModel::new("SCORE: 0.90\nREFINED: unchanged");
    let pipeline = build_pipeline(Arc::clone(&searcher), smart, Arc::clone(&grader));

    let answer = pipeline
        .ask("How can I persist data in Docker containers?")
        .await
        .unwrap();

    assert!(!answer.trim().is_empty());
    // One search call per expanded query, single pass.
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 2);
    assert_eq!(grader.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_grade_performs_exactly_two_retrieval_passes() {
    let searcher = FixedSearcher::new(volumes_corpus());
    let smart = ScriptedSmartModel::new(
        "query one\nquery two\nquery three",
        "Closest match: volumes.",
    );
    let grader = FixedGraderModel::new("SCORE: 0.10\nREFINED: refined docker question");
    let pipeline = build_pipeline(Arc::clone(&searcher), smart, Arc::clone(&grader));

    let state = pipeline.run("original question").await.unwrap();

    // First pass dispatches the 3 expansions, the retry dispatches only
    // the single refined query; never a third pass.
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 4);
    assert_eq!(grader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.retry_count, 0);
    assert_eq!(state.expanded_queries, vec!["refined docker question".to_string()]);
    assert!(state.answer_text.is_some());
}

#[tokio::test]
async fn original_query_survives_refinement() {
    let searcher = FixedSearcher::new(volumes_corpus());
    let smart = ScriptedSmartModel::new("only query", "answer");
    let grader = FixedGraderModel::new("SCORE: 0.10\nREFINED: something else entirely");
    let pipeline = build_pipeline(searcher, Arc::clone(&smart), grader);

    let state = pipeline.run("How can I persist data in Docker containers?").await.unwrap();

    assert_eq!(state.original_query, "How can I persist data in Docker containers?");
    assert_eq!(state.active_query, "something else entirely");
}

#[tokio::test]
async fn empty_retrieval_still_generates_an_answer() {
    let searcher = FixedSearcher::new(vec![]);
    let smart = ScriptedSmartModel::new("only query", "The documentation has no such information.");
    let grader = FixedGraderModel::new("SCORE: 0.90\nREFINED: unchanged");
    let pipeline = build_pipeline(searcher, smart, Arc::clone(&grader));

    let state = pipeline.run("anything").await.unwrap();

    // Grading is skipped outright on empty evidence, no grader call made.
    assert_eq!(grader.calls.load(Ordering::SeqCst), 0);
    assert!(state.reranked_documents.is_empty());
    assert_eq!(state.context_text, "");
    assert!(state.answer_text.is_some());
}

#[tokio::test]
async fn trace_documents_report_stages_and_model_calls() {
    let searcher = FixedSearcher::new(volumes_corpus());
    let smart = ScriptedSmartModel::new("q1\nq2", "Use volumes.");
    let grader = FixedGraderModel::new("SCORE: 0.90\nREFINED: unchanged");
    let pipeline = build_pipeline(searcher, smart, grader);

    let (answer_doc, trace_doc) = pipeline
        .ask_with_trace("How can I persist data in Docker containers?")
        .await
        .unwrap();

    assert!(answer_doc.contains("Query: How can I persist data in Docker containers?"));
    assert!(answer_doc.contains("Use volumes."));

    for stage in ["expand", "retrieve", "grade", "compact", "generate"] {
        assert!(trace_doc.contains(stage), "trace missing stage {stage}: {trace_doc}");
    }
    assert!(trace_doc.contains("Calls per model:"));
    // Smart model serves expansion and generation.
    assert!(trace_doc.contains("- mock/smart: 2"));
    assert!(trace_doc.contains("- mock/grader: 1"));
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_calls() {
    let searcher = FixedSearcher::new(volumes_corpus());
    let smart = ScriptedSmartModel::new("q", "a");
    let grader = FixedGraderModel::new("SCORE: 0.90\nREFINED: x");
    let pipeline = build_pipeline(Arc::clone(&searcher), Arc::clone(&smart), grader);

    let result = pipeline.ask("   ").await;

    assert!(matches!(result, Err(AskdocsError::Validation { .. })));
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(smart.calls.load(Ordering::SeqCst), 0);
}

#[derive(Debug)]
struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(AskdocsError::llm("provider unreachable"))
    }

    fn model_id(&self) -> &str {
        "mock/failing"
    }
}

#[tokio::test]
async fn expansion_failure_is_fatal() {
    let pipeline = RagPipeline::builder()
        .searcher(FixedSearcher::new(volumes_corpus()))
        .smart_llm(Arc::new(FailingChat))
        .grader_llm(FixedGraderModel::new("SCORE: 0.90\nREFINED: x"))
        .build()
        .unwrap();

    let result = pipeline.ask("question").await;
    assert!(matches!(result, Err(AskdocsError::Expansion { .. })));
}

#[tokio::test]
async fn grading_transport_failure_is_not_masked() {
    let pipeline = RagPipeline::builder()
        .searcher(FixedSearcher::new(volumes_corpus()))
        .smart_llm(ScriptedSmartModel::new("q", "a"))
        .grader_llm(Arc::new(FailingChat))
        .build()
        .unwrap();

    let result = pipeline.ask("question").await;
    assert!(matches!(result, Err(AskdocsError::Grading { .. })));
}
