//! Lexical-overlap reranking
//!
//! Rescales an initial candidate ordering using the term overlap between
//! the query and each candidate's text.

use docqa_core::ScoredHit;
use docqa_text::terms;

/// Reranking stage contract.
pub trait Reranker: Send + Sync {
    fn rerank(&self, query: &str, contexts: Vec<ScoredHit>) -> Vec<ScoredHit>;
}

/// Blends the original score with Jaccard term overlap.
///
/// Overlap is computed between the case-folded, punctuation-stripped term
/// sets of the query and the candidate text (1.0 when both sets are
/// empty). The overlap value is recorded as a `lexical_overlap`
/// diagnostic.
pub struct LexicalOverlapReranker {
    base_score_weight: f32,
}

impl LexicalOverlapReranker {
    /// Create a reranker; `base_score_weight` is the weight kept by the
    /// original score (the overlap gets the complement).
    pub fn new(base_score_weight: f32) -> Self {
        Self { base_score_weight }
    }

    fn term_set(text: &str) -> std::collections::HashSet<String> {
        terms(text).into_iter().collect()
    }

    fn jaccard(
        a: &std::collections::HashSet<String>,
        b: &std::collections::HashSet<String>,
    ) -> f32 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }

        let union = a.union(b).count();
        if union == 0 {
            return 0.0;
        }

        let intersection = a.intersection(b).count();
        intersection as f32 / union as f32
    }
}

impl Default for LexicalOverlapReranker {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Reranker for LexicalOverlapReranker {
    fn rerank(&self, query: &str, mut contexts: Vec<ScoredHit>) -> Vec<ScoredHit> {
        let query_terms = Self::term_set(query);

        for ctx in &mut contexts {
            let doc_terms = Self::term_set(&ctx.text);
            let overlap = Self::jaccard(&query_terms, &doc_terms);

            ctx.record_diagnostic("lexical_overlap", overlap as f64);
            ctx.score =
                self.base_score_weight * ctx.score + (1.0 - self.base_score_weight) * overlap;
        }

        contexts.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        contexts
    }
}
