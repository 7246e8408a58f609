//! JSON-file-backed vector store
//!
//! A small durable store that reloads the full item list on every
//! operation. Intended for local corpora where simplicity beats speed.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use docqa_core::{Filters, IndexedItem, ScoredHit};

use crate::vector_store::{cosine_similarity, matches_filters, PersistableVectorStore, VectorStore};
use crate::RagError;

pub struct JsonFileVectorStore {
    path: PathBuf,
}

impl JsonFileVectorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn persistence_err(&self, reason: impl ToString) -> RagError {
        RagError::Persistence {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn load_all(&self) -> Result<HashMap<String, IndexedItem>, RagError> {
        if !self.path.is_file() {
            return Ok(HashMap::new());
        }

        let raw = std::fs::read_to_string(&self.path).map_err(|e| self.persistence_err(e))?;
        let items: Vec<IndexedItem> =
            serde_json::from_str(&raw).map_err(|e| self.persistence_err(e))?;

        Ok(items.into_iter().map(|item| (item.id.clone(), item)).collect())
    }

    fn write_all(&self, items: &HashMap<String, IndexedItem>) -> Result<(), RagError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| self.persistence_err(e))?;
            }
        }

        let mut list: Vec<&IndexedItem> = items.values().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));

        let json = serde_json::to_string_pretty(&list).map_err(|e| self.persistence_err(e))?;
        std::fs::write(&self.path, json).map_err(|e| self.persistence_err(e))
    }
}

#[async_trait]
impl VectorStore for JsonFileVectorStore {
    async fn upsert(&self, items: Vec<IndexedItem>) -> Result<(), RagError> {
        let mut current = self.load_all()?;
        for item in items {
            current.insert(item.id.clone(), item);
        }
        self.write_all(&current)
    }

    async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
        filters: &Filters,
    ) -> Result<Vec<ScoredHit>, RagError> {
        let mut scored: Vec<ScoredHit> = self
            .load_all()?
            .into_values()
            .filter(|item| matches_filters(&item.metadata, filters))
            .map(|item| ScoredHit {
                score: cosine_similarity(query_vector, &item.vector),
                id: item.id,
                text: item.text,
                metadata: item.metadata,
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.max(1));
        Ok(scored)
    }
}

#[async_trait]
impl PersistableVectorStore for JsonFileVectorStore {
    async fn export_items(&self) -> Result<Vec<IndexedItem>, RagError> {
        let mut items: Vec<IndexedItem> = self.load_all()?.into_values().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn import_items(&self, items: Vec<IndexedItem>) -> Result<(), RagError> {
        self.upsert(items).await
    }
}
