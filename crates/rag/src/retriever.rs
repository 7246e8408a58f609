//! Dense and hybrid retrieval
//!
//! `SimilarityRetriever` is the dense-only baseline; `HybridRetriever`
//! extends it by fusing an approximate lexical score into the dense
//! ranking.

use std::sync::Arc;

use async_trait::async_trait;

use docqa_core::{Filters, ScoredHit};
use docqa_text::terms;

use crate::embeddings::Embedder;
use crate::vector_store::VectorStore;
use crate::RagError;

/// Retrieval stage contract: ranked, scored hits for a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
        filters: &Filters,
    ) -> Result<Vec<ScoredHit>, RagError>;
}

/// Dense-only retrieval: embed the query and delegate to the store.
pub struct SimilarityRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl SimilarityRetriever {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }
}

#[async_trait]
impl Retriever for SimilarityRetriever {
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
        filters: &Filters,
    ) -> Result<Vec<ScoredHit>, RagError> {
        let query_vector = self.embedder.embed(query).await?;
        self.store.search(&query_vector, k, filters).await
    }
}

/// Hybrid retriever configuration
#[derive(Debug, Clone, Copy)]
pub struct HybridConfig {
    /// Weight of the dense score in fusion (0.0 - 1.0); the lexical score
    /// gets the complement.
    pub dense_weight: f32,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self { dense_weight: 0.7 }
    }
}

impl From<&docqa_config::RetrievalSettings> for HybridConfig {
    fn from(settings: &docqa_config::RetrievalSettings) -> Self {
        Self {
            dense_weight: settings.dense_weight,
        }
    }
}

/// Dense retrieval fused with an approximate lexical score.
///
/// Overfetches `max(10, 3k)` dense candidates, scores each against the
/// query with an Okapi-style term-frequency saturation that assumes a
/// fixed average document length (no corpus document-frequency/idf term —
/// an approximation of true BM25, not a drop-in replacement), and re-ranks
/// by the convex combination of both signals. Per-candidate `dense_score`
/// and `lexical_score` are recorded as diagnostics.
pub struct HybridRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    config: HybridConfig,
}

// Saturation parameters for the lexical component. The average document
// length is assumed rather than measured.
const LEXICAL_K1: f32 = 1.5;
const LEXICAL_B: f32 = 0.75;
const ASSUMED_AVG_DOC_LEN: f32 = 100.0;

impl HybridRetriever {
    /// Create a hybrid retriever; fails fast on a weight outside 0.0..=1.0.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        config: HybridConfig,
    ) -> Result<Self, RagError> {
        if !(0.0..=1.0).contains(&config.dense_weight) {
            return Err(RagError::Search(format!(
                "dense_weight must be within 0.0..=1.0, got {}",
                config.dense_weight
            )));
        }
        Ok(Self {
            embedder,
            store,
            config,
        })
    }

    fn lexical_score(query_terms: &[String], document: &str) -> f32 {
        let doc_terms = terms(document);
        if doc_terms.is_empty() {
            return 0.0;
        }

        let mut tf: std::collections::HashMap<&str, f32> = std::collections::HashMap::new();
        for t in &doc_terms {
            *tf.entry(t.as_str()).or_insert(0.0) += 1.0;
        }

        let doc_len = doc_terms.len() as f32;
        let mut score = 0.0f32;
        for term in query_terms {
            let f = match tf.get(term.as_str()) {
                Some(&f) if f > 0.0 => f,
                _ => continue,
            };

            let norm = doc_len / ASSUMED_AVG_DOC_LEN;
            score += (f * (LEXICAL_K1 + 1.0))
                / (f + LEXICAL_K1 * (1.0 - LEXICAL_B + LEXICAL_B * norm));
        }

        score
    }
}

#[async_trait]
impl Retriever for HybridRetriever {
    async fn retrieve(
        &self,
        query: &str,
        k: usize,
        filters: &Filters,
    ) -> Result<Vec<ScoredHit>, RagError> {
        let query_vector = self.embedder.embed(query).await?;
        let fetch = (3 * k).max(10);
        let mut hits = self.store.search(&query_vector, fetch, filters).await?;

        let query_terms = terms(query);
        for hit in &mut hits {
            let dense = hit.score;
            let lexical = Self::lexical_score(&query_terms, &hit.text);

            hit.record_diagnostic("dense_score", dense as f64);
            hit.record_diagnostic("lexical_score", lexical as f64);
            hit.score =
                self.config.dense_weight * dense + (1.0 - self.config.dense_weight) * lexical;
        }

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k.max(1));

        tracing::debug!(query, k, candidates = fetch, returned = hits.len(), "hybrid retrieval");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::InMemoryVectorStore;
    use docqa_core::{IndexedItem, Metadata};

    /// Embedder that returns the same fixed vector for every query, so
    /// dense scores are fully determined by the stored vectors.
    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, RagError> {
            Ok(self.0.clone())
        }
    }

    fn item(id: &str, vector: Vec<f32>, text: &str) -> IndexedItem {
        IndexedItem {
            id: id.to_string(),
            vector,
            text: text.to_string(),
            metadata: Metadata::new(),
        }
    }

    async fn store_with_two_docs() -> Arc<InMemoryVectorStore> {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .upsert(vec![
                // "dense" aligns with the query vector but shares no terms
                item("dense", vec![1.0, 0.0], "completely unrelated wording"),
                // "lexical" is dense-orthogonal but repeats the query terms
                item("lexical", vec![0.0, 1.0], "gold loan gold loan gold"),
            ])
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_rejects_malformed_weight() {
        let embedder = Arc::new(FixedEmbedder(vec![1.0]));
        let store = Arc::new(InMemoryVectorStore::new());
        assert!(HybridRetriever::new(embedder, store, HybridConfig { dense_weight: 1.5 }).is_err());
    }

    #[tokio::test]
    async fn test_pure_dense_weight_reproduces_dense_order() {
        let store = store_with_two_docs().await;
        let retriever = HybridRetriever::new(
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            store,
            HybridConfig { dense_weight: 1.0 },
        )
        .unwrap();

        let hits = retriever
            .retrieve("gold loan", 2, &Filters::new())
            .await
            .unwrap();
        assert_eq!(hits[0].id, "dense");
    }

    #[tokio::test]
    async fn test_pure_lexical_weight_reproduces_lexical_order() {
        let store = store_with_two_docs().await;
        let retriever = HybridRetriever::new(
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            store,
            HybridConfig { dense_weight: 0.0 },
        )
        .unwrap();

        let hits = retriever
            .retrieve("gold loan", 2, &Filters::new())
            .await
            .unwrap();
        assert_eq!(hits[0].id, "lexical");
    }

    #[tokio::test]
    async fn test_fused_score_is_convex_combination() {
        let store = store_with_two_docs().await;
        let retriever = HybridRetriever::new(
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            store,
            HybridConfig { dense_weight: 0.6 },
        )
        .unwrap();

        let hits = retriever
            .retrieve("gold loan", 2, &Filters::new())
            .await
            .unwrap();

        for hit in &hits {
            let dense = hit.diagnostic("dense_score").unwrap() as f32;
            let lexical = hit.diagnostic("lexical_score").unwrap() as f32;
            let expected = 0.6 * dense + 0.4 * lexical;
            assert!((hit.score - expected).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_truncates_to_k() {
        let store = Arc::new(InMemoryVectorStore::new());
        let items: Vec<IndexedItem> = (0..12)
            .map(|i| item(&format!("doc-{}", i), vec![1.0, i as f32 * 0.01], "text"))
            .collect();
        store.upsert(items).await.unwrap();

        let retriever = HybridRetriever::new(
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            store,
            HybridConfig::default(),
        )
        .unwrap();

        let hits = retriever.retrieve("text", 2, &Filters::new()).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_similarity_retriever_passthrough() {
        let store = store_with_two_docs().await;
        let retriever =
            SimilarityRetriever::new(Arc::new(FixedEmbedder(vec![1.0, 0.0])), store);

        let hits = retriever
            .retrieve("anything", 1, &Filters::new())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "dense");
    }
}
