//! Embedder contract and deterministic hash embedder

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::RagError;

/// Turns text into a dense vector. External embedding models implement
/// this; the pipeline never inspects how vectors are produced.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Embed a batch of texts, preserving order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Deterministic local embedder for tests and offline runs.
///
/// Each token's digest bytes are accumulated into the vector, which is then
/// L2-normalized. No external calls; identical text always embeds to the
/// identical vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(4),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];

        for token in text.trim().to_lowercase().split_whitespace() {
            if token.is_empty() {
                continue;
            }

            let digest = Sha256::digest(token.as_bytes());
            for (i, slot) in vec.iter_mut().enumerate() {
                let byte = digest[i % digest.len()];
                *slot += byte as f32 / 255.0;
            }
        }

        let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vec {
                *v /= norm;
            }
        }

        vec
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(32)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(self.embed_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("gold loan rates").await.unwrap();
        let b = embedder.embed("gold loan rates").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn test_normalized() {
        let embedder = HashEmbedder::new(16);
        let v = embedder.embed("some text here").await.unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(8);
        let v = embedder.embed("   ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_minimum_dimensions() {
        let embedder = HashEmbedder::new(1);
        assert_eq!(embedder.dimensions(), 4);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let embedder = HashEmbedder::default();
        let texts = vec!["first".to_string(), "second".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(batch[0], embedder.embed("first").await.unwrap());
        assert_eq!(batch[1], embedder.embed("second").await.unwrap());
    }
}
