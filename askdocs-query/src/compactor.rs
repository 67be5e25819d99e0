//! Context compaction stage.
//!
//! Truncates the merged evidence into a bounded textual context. The
//! "rerank" here is a plain truncation of the retrieval/dedup order, kept
//! for compatibility rather than a relevance reordering.

use askdocs_core::Document;
use tracing::debug;

/// Number of documents kept as the reranked slice.
pub const RERANK_KEEP: usize = 8;

/// Number of reranked documents concatenated into the context window.
pub const CONTEXT_KEEP: usize = 6;

/// Visible delimiter between context fragments.
const DELIMITER: &str = "\n\n---\n\n";

/// Result of compaction: the kept documents plus the assembled context.
#[derive(Debug, Clone, Default)]
pub struct Compacted {
    /// First [`RERANK_KEEP`] retrieved documents.
    pub reranked_documents: Vec<Document>,

    /// Context window built from the first [`CONTEXT_KEEP`] of those,
    /// each tagged with a 1-based ordinal and its source title.
    pub context_text: String,
}

/// Compact `documents` into a bounded context window.
///
/// Empty input yields an empty slice and an empty context; it never errors.
pub fn compact(documents: &[Document]) -> Compacted {
    let reranked: Vec<Document> = documents.iter().take(RERANK_KEEP).cloned().collect();

    let context_text = reranked
        .iter()
        .take(CONTEXT_KEEP)
        .enumerate()
        .map(|(i, d)| format!("[{}] (from: {})\n{}", i + 1, d.title(), d.content))
        .collect::<Vec<_>>()
        .join(DELIMITER);

    debug!(
        "Compacted {} documents into {} context characters",
        reranked.len(),
        context_text.len()
    );

    Compacted {
        reranked_documents: reranked,
        context_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str, title: &str) -> Document {
        Document::new(content).with_metadata("title", title)
    }

    #[test]
    fn test_context_includes_titles_and_content() {
        let docs = vec![doc("Content A", "Doc1"), doc("Content B", "Doc2")];
        let compacted = compact(&docs);
        assert!(compacted.context_text.contains("Content A"));
        assert!(compacted.context_text.contains("Content B"));
        assert!(compacted.context_text.contains("(from: Doc1)"));
        assert!(compacted.context_text.contains("[2] (from: Doc2)"));
    }

    #[test]
    fn test_keeps_eight_and_contextualizes_six() {
        let docs: Vec<Document> = (0..10)
            .map(|i| doc(&format!("Content {i}"), &format!("Doc{i}")))
            .collect();
        let compacted = compact(&docs);
        assert_eq!(compacted.reranked_documents.len(), RERANK_KEEP);
        for i in 0..CONTEXT_KEEP {
            assert!(compacted.context_text.contains(&format!("Content {i}")));
        }
        assert!(!compacted.context_text.contains("Content 6"));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let compacted = compact(&[]);
        assert!(compacted.reranked_documents.is_empty());
        assert_eq!(compacted.context_text, "");
    }

    #[test]
    fn test_fragments_are_delimited() {
        let docs = vec![doc("A", "1"), doc("B", "2")];
        let compacted = compact(&docs);
        assert!(compacted.context_text.contains("\n\n---\n\n"));
    }
}
