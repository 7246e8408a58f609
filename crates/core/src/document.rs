//! Document, chunk, and retrieval record types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form metadata attached to documents, chunks, and hits.
pub type Metadata = HashMap<String, Value>;

/// Equality constraints on metadata used to narrow a search.
pub type Filters = HashMap<String, Value>;

/// A source document owned by the caller.
///
/// Immutable once created; the splitter never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique ID within the corpus
    pub id: String,
    /// Full document text
    pub text: String,
    /// Caller-supplied metadata, propagated to every chunk
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Attach metadata to the document
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A bounded, possibly overlapping slice of a document.
///
/// The id is derived as `<document_id>#chunk-<index>`; metadata always
/// carries `document_id` and `chunk_index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A record held by a vector store: chunk text plus its embedding.
///
/// Upserts are idempotent by id; the last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedItem {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// The unit returned by every retrieval or reranking stage.
///
/// Scores are retrieval-method-relative; they are not comparable across
/// strategies unless explicitly fused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredHit {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub score: f32,
}

impl ScoredHit {
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
            score,
        }
    }

    /// Record a per-stage diagnostic value under `metadata["diagnostics"]`.
    pub fn record_diagnostic(&mut self, key: &str, value: f64) {
        let diagnostics = self
            .metadata
            .entry("diagnostics".to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));

        if let Value::Object(map) = diagnostics {
            map.insert(key.to_string(), Value::from(value));
        }
    }

    /// Read back a diagnostic recorded by a retrieval stage.
    pub fn diagnostic(&self, key: &str) -> Option<f64> {
        self.metadata
            .get("diagnostics")
            .and_then(|d| d.get(key))
            .and_then(Value::as_f64)
    }
}
