//! Human-readable report documents.
//!
//! The trace-enabled entry point returns two documents: one with the
//! query and answer, one reconstructing the execution from the
//! append-only trace entries, with a per-model call-count summary.

use askdocs_core::PipelineState;

/// Build the answer document for a completed run.
#[must_use]
pub fn answer_document(state: &PipelineState) -> String {
    format!(
        "Query: {}\n\nAnswer:\n{}",
        state.original_query,
        state.answer_text.as_deref().unwrap_or("")
    )
}

/// Build the execution trace document for a completed run.
///
/// Lists every stage execution in order with the model used, the call
/// count, and the stage's detail message, followed by total calls per
/// model.
#[must_use]
pub fn trace_document(state: &PipelineState) -> String {
    let mut lines = vec!["Execution trace:".to_string()];

    for (i, entry) in state.trace_entries.iter().enumerate() {
        let model = entry.model_used.as_deref().unwrap_or("-");
        lines.push(format!(
            "{}. {} | model: {} | calls: {} | {}",
            i + 1,
            entry.stage_name,
            model,
            entry.call_count,
            entry.detail_message
        ));
    }

    let mut per_model: Vec<(String, usize)> = Vec::new();
    for entry in &state.trace_entries {
        if let Some(model) = &entry.model_used {
            match per_model.iter_mut().find(|(m, _)| m == model) {
                Some((_, count)) => *count += entry.call_count,
                None => per_model.push((model.clone(), entry.call_count)),
            }
        }
    }

    lines.push(String::new());
    lines.push("Calls per model:".to_string());
    for (model, count) in per_model {
        lines.push(format!("- {model}: {count}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdocs_core::TraceEntry;

    fn traced_state() -> PipelineState {
        let mut state = PipelineState::new("How to persist data?");
        state.answer_text = Some("Use volumes.".to_string());
        state.record(
            TraceEntry::new("expand", "expanded into 2 queries")
                .with_model("deepseek/deepseek-chat")
                .with_call_count(1),
        );
        state.record(TraceEntry::new("retrieve", "merged 5 documents from 2 queries").with_call_count(2));
        state.record(
            TraceEntry::new("generate", "answer with 12 characters")
                .with_model("deepseek/deepseek-chat")
                .with_call_count(1),
        );
        state
    }

    #[test]
    fn test_answer_document_contains_query_and_answer() {
        let doc = answer_document(&traced_state());
        assert!(doc.contains("Query: How to persist data?"));
        assert!(doc.contains("Answer:\nUse volumes."));
    }

    #[test]
    fn test_trace_document_lists_stages_in_order() {
        let doc = trace_document(&traced_state());
        let expand_pos = doc.find("1. expand").unwrap();
        let retrieve_pos = doc.find("2. retrieve").unwrap();
        let generate_pos = doc.find("3. generate").unwrap();
        assert!(expand_pos < retrieve_pos && retrieve_pos < generate_pos);
    }

    #[test]
    fn test_trace_document_sums_calls_per_model() {
        let doc = trace_document(&traced_state());
        assert!(doc.contains("- deepseek/deepseek-chat: 2"));
    }

    #[test]
    fn test_stage_without_model_renders_dash() {
        let doc = trace_document(&traced_state());
        assert!(doc.contains("retrieve | model: - | calls: 2"));
    }
}
