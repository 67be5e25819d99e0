//! Document type and content fingerprinting.
//!
//! Documents are the retrieval unit: produced by the search backend,
//! consumed read-only by every later pipeline stage.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Number of leading content characters hashed into a document fingerprint.
///
/// Documents with identical leading content collapse to one during the
/// retrieval merge, regardless of which expanded query produced them.
pub const FINGERPRINT_PREFIX_CHARS: usize = 200;

/// Represents one retrieved chunk of the documentation corpus.
///
/// A document contains the chunk text along with metadata about its source.
/// Documents are immutable once retrieved.
///
/// # Examples
///
/// ```rust
/// use askdocs_core::types::Document;
///
/// let doc = Document::new("docker volume create my-vol")
///     .with_metadata("title", "Volumes")
///     .with_metadata("source", "storage/volumes.md");
///
/// assert_eq!(doc.title(), "Volumes");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: Uuid,

    /// Raw content of the chunk.
    pub content: String,

    /// Document metadata (title, source, etc.).
    ///
    /// Common metadata keys include:
    /// - `title`: Title of the documentation page the chunk came from
    /// - `source`: Original file path or URL
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a new document with the given content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use askdocs_core::types::Document;
    ///
    /// let doc = Document::new("Hello, world!");
    /// assert_eq!(doc.content, "Hello, world!");
    /// assert!(doc.metadata.is_empty());
    /// ```
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add or update metadata for this document.
    #[must_use]
    pub fn with_metadata<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<serde_json::Value>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Get the document title, or `"?"` if none is set.
    ///
    /// Mirrors the fallback used when formatting context and previews.
    #[must_use]
    pub fn title(&self) -> &str {
        self.metadata
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("?")
    }

    /// Get the source identifier, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }

    /// Compute the deduplication fingerprint of this document.
    ///
    /// The fingerprint is a hash of the first [`FINGERPRINT_PREFIX_CHARS`]
    /// characters of content. The prefix is counted in characters, not
    /// bytes, so multi-byte content never splits a code point.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for c in self.content.chars().take(FINGERPRINT_PREFIX_CHARS) {
            c.hash(&mut hasher);
        }
        hasher.finish()
    }
}
