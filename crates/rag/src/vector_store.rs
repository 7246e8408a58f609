//! Vector store contract and in-memory implementation

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use docqa_core::{Filters, IndexedItem, Metadata, ScoredHit};

use crate::RagError;

/// External storage for embedded chunks.
///
/// The pipeline only requires that a higher score means more similar and
/// that filters narrow the candidate set by metadata equality. How
/// similarity is computed is the store's concern.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace items by id (last write wins)
    async fn upsert(&self, items: Vec<IndexedItem>) -> Result<(), RagError>;

    /// Return the `k` nearest items by the store's similarity metric,
    /// scored, most similar first.
    async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
        filters: &Filters,
    ) -> Result<Vec<ScoredHit>, RagError>;
}

/// A vector store whose full item list can be exported and re-imported for
/// snapshotting.
#[async_trait]
pub trait PersistableVectorStore: VectorStore {
    async fn export_items(&self) -> Result<Vec<IndexedItem>, RagError>;

    /// Import items into the store (replace-by-upsert semantics)
    async fn import_items(&self, items: Vec<IndexedItem>) -> Result<(), RagError>;
}

/// In-memory cosine-similarity store for tests and small corpora.
#[derive(Default)]
pub struct InMemoryVectorStore {
    items: RwLock<HashMap<String, IndexedItem>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, items: Vec<IndexedItem>) -> Result<(), RagError> {
        let mut store = self.items.write();
        for item in items {
            store.insert(item.id.clone(), item);
        }
        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
        filters: &Filters,
    ) -> Result<Vec<ScoredHit>, RagError> {
        let store = self.items.read();

        let mut scored: Vec<ScoredHit> = store
            .values()
            .filter(|item| matches_filters(&item.metadata, filters))
            .map(|item| ScoredHit {
                id: item.id.clone(),
                text: item.text.clone(),
                metadata: item.metadata.clone(),
                score: cosine_similarity(query_vector, &item.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.max(1));
        Ok(scored)
    }
}

#[async_trait]
impl PersistableVectorStore for InMemoryVectorStore {
    async fn export_items(&self) -> Result<Vec<IndexedItem>, RagError> {
        let mut items: Vec<IndexedItem> = self.items.read().values().cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn import_items(&self, items: Vec<IndexedItem>) -> Result<(), RagError> {
        self.upsert(items).await
    }
}

/// Metadata equality filter shared by the local stores.
pub(crate) fn matches_filters(metadata: &Metadata, filters: &Filters) -> bool {
    filters
        .iter()
        .all(|(key, value)| metadata.get(key) == Some(value))
}

/// Cosine similarity over the common prefix of two vectors.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..n {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: &str, vector: Vec<f32>, text: &str) -> IndexedItem {
        IndexedItem {
            id: id.to_string(),
            vector,
            text: text.to_string(),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_upsert_last_write_wins() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(vec![item("a", vec![1.0, 0.0], "old")])
            .await
            .unwrap();
        store
            .upsert(vec![item("a", vec![0.0, 1.0], "new")])
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let hits = store.search(&[0.0, 1.0], 1, &Filters::new()).await.unwrap();
        assert_eq!(hits[0].text, "new");
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(vec![
                item("near", vec![1.0, 0.1], "near"),
                item("far", vec![0.0, 1.0], "far"),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2, &Filters::new()).await.unwrap();
        assert_eq!(hits[0].id, "near");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn test_filters_narrow_candidates() {
        let store = InMemoryVectorStore::new();
        let mut tagged = item("a", vec![1.0], "tagged");
        tagged
            .metadata
            .insert("source".to_string(), json!("notes"));
        store
            .upsert(vec![tagged, item("b", vec![1.0], "untagged")])
            .await
            .unwrap();

        let mut filters = Filters::new();
        filters.insert("source".to_string(), json!("notes"));

        let hits = store.search(&[1.0], 5, &filters).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(vec![item("a", vec![1.0], "a"), item("b", vec![2.0], "b")])
            .await
            .unwrap();

        let exported = store.export_items().await.unwrap();
        assert_eq!(exported.len(), 2);

        let other = InMemoryVectorStore::new();
        other.import_items(exported).await.unwrap();
        assert_eq!(other.len(), 2);
    }
}
