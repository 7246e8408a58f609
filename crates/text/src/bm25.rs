//! Owned-corpus BM25 lexical index
//!
//! The index owns its corpus statistics explicitly: `add_documents` appends
//! tokenized documents, `build` recomputes document frequency, per-document
//! length, and average length wholesale, and `search` scores a query
//! against the built statistics. Statistics are never rebuilt implicitly —
//! call `build` after every batch of additions, before searching.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use docqa_core::ScoredHit;

use crate::tokenize::tokenize;

/// BM25 parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bm25Config {
    /// Term-frequency saturation
    pub k1: f32,
    /// Length normalization strength
    pub b: f32,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// BM25 index over an owned corpus.
///
/// Documents get sequential integer ids in insertion order; hits expose the
/// id in decimal string form.
pub struct Bm25Index {
    config: Bm25Config,
    docs: Vec<Vec<String>>,
    raw_docs: Vec<String>,
    df: HashMap<String, usize>,
    doc_len: Vec<usize>,
    avg_doc_len: f32,
}

impl Bm25Index {
    pub fn new(config: Bm25Config) -> Self {
        Self {
            config,
            docs: Vec::new(),
            raw_docs: Vec::new(),
            df: HashMap::new(),
            doc_len: Vec::new(),
            avg_doc_len: 0.0,
        }
    }

    /// Append documents to the corpus. Statistics are stale until the next
    /// `build`.
    pub fn add_documents<S: AsRef<str>>(&mut self, documents: &[S]) {
        for doc in documents {
            let text = doc.as_ref();
            self.docs.push(tokenize(text));
            self.raw_docs.push(text.to_string());
        }
    }

    /// Recompute document frequency, document lengths, and the corpus
    /// average length from scratch.
    pub fn build(&mut self) {
        self.df.clear();
        self.doc_len.clear();
        let mut sum = 0usize;

        for tokens in &self.docs {
            self.doc_len.push(tokens.len());
            sum += tokens.len();

            let mut seen: HashSet<&str> = HashSet::new();
            for t in tokens {
                if seen.insert(t.as_str()) {
                    *self.df.entry(t.clone()).or_insert(0) += 1;
                }
            }
        }

        self.avg_doc_len = if self.docs.is_empty() {
            0.0
        } else {
            sum as f32 / self.docs.len() as f32
        };

        tracing::debug!(
            documents = self.docs.len(),
            terms = self.df.len(),
            avg_doc_len = self.avg_doc_len,
            "built lexical index"
        );
    }

    /// Number of indexed documents
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Score every document against the query and return the top `top_k`
    /// hits in descending score order. Ties keep insertion order. Returns
    /// empty when the query tokenizes to nothing or the corpus is empty.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<ScoredHit> {
        let q_terms = tokenize(query);
        if q_terms.is_empty() || self.docs.is_empty() {
            return Vec::new();
        }

        let n = self.docs.len() as f32;
        let mut scored: Vec<(usize, f32)> = Vec::with_capacity(self.docs.len());

        for (id, tokens) in self.docs.iter().enumerate() {
            let mut tf: HashMap<&str, f32> = HashMap::new();
            for t in tokens {
                *tf.entry(t.as_str()).or_insert(0.0) += 1.0;
            }

            let mut score = 0.0f32;
            for term in &q_terms {
                let df = match self.df.get(term.as_str()) {
                    Some(&df) if df > 0 => df as f32,
                    _ => continue,
                };
                let f = match tf.get(term.as_str()) {
                    Some(&f) if f > 0.0 => f,
                    _ => continue,
                };

                let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();
                let dl = *self.doc_len.get(id).unwrap_or(&1) as f32;
                let norm = dl / self.avg_doc_len.max(f32::EPSILON);
                let den = f + self.config.k1 * (1.0 - self.config.b + self.config.b * norm);
                score += idf * (f * (self.config.k1 + 1.0)) / den.max(f32::EPSILON);
            }

            scored.push((id, score));
        }

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(id, score)| ScoredHit::new(id.to_string(), self.raw_docs[id].clone(), score))
            .collect()
    }
}

impl Default for Bm25Index {
    fn default() -> Self {
        Self::new(Bm25Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(docs: &[&str]) -> Bm25Index {
        let mut index = Bm25Index::default();
        index.add_documents(docs);
        index.build();
        index
    }

    #[test]
    fn test_cat_outranks_dog() {
        let index = index_of(&["the cat sat", "the dog ran"]);
        let hits = index.search("cat", 5);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "0");
        assert!(hits[0].score > hits[1].score);
        assert_eq!(hits[1].score, 0.0);
    }

    #[test]
    fn test_empty_query_and_empty_corpus() {
        let index = index_of(&["something"]);
        assert!(index.search("", 5).is_empty());
        assert!(index.search("...", 5).is_empty());

        let empty = Bm25Index::default();
        assert!(empty.search("cat", 5).is_empty());
    }

    #[test]
    fn test_top_k_covers_whole_corpus_sorted() {
        let index = index_of(&["apple pie recipe", "apple tree", "banana bread"]);
        let hits = index.search("apple", 10);

        assert_eq!(hits.len(), 3);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_scores_invariant_to_insertion_order() {
        let a = index_of(&["gold loan rates", "weather today", "gold prices"]);
        let b = index_of(&["weather today", "gold prices", "gold loan rates"]);

        let score_for = |index: &Bm25Index, text: &str| {
            index
                .search("gold", 10)
                .into_iter()
                .find(|h| h.text == text)
                .map(|h| h.score)
        };

        for text in ["gold loan rates", "gold prices", "weather today"] {
            let sa = score_for(&a, text);
            let sb = score_for(&b, text);
            match (sa, sb) {
                (Some(sa), Some(sb)) => assert!((sa - sb).abs() < 1e-6),
                (None, None) => {}
                _ => panic!("hit present in one index only"),
            }
        }
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = index_of(&["cat cat", "cat cat", "dog"]);
        let hits = index.search("cat", 10);

        assert_eq!(hits[0].id, "0");
        assert_eq!(hits[1].id, "1");
    }

    #[test]
    fn test_unknown_terms_contribute_zero() {
        let index = index_of(&["alpha beta", "beta gamma"]);
        let hits = index.search("zeppelin", 10);

        assert!(hits.iter().all(|h| h.score == 0.0));
    }

    #[test]
    fn test_add_without_rebuild_is_stale() {
        let mut index = index_of(&["first doc"]);
        index.add_documents(&["second doc about cats"]);
        // Not rebuilt: the new document has no length/df statistics yet,
        // but searching must not panic.
        let hits = index.search("cats", 10);
        assert_eq!(hits.len(), 2);

        index.build();
        let hits = index.search("cats", 10);
        assert_eq!(hits[0].id, "1");
        assert!(hits[0].score > 0.0);
    }
}
