//! Retrieval-QA chain
//!
//! Composes expansion, retrieval, merging, reranking, prompting,
//! generation, and verification into one ask pipeline. All collaborators
//! are pluggable; the chain never hard-wires a concrete backend.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use docqa_core::{Document, Filters, IndexedItem, ScoredHit, VerificationResult};
use docqa_llm::{GenerationOptions, LlmClient};
use docqa_text::TextSplitter;

use crate::embeddings::Embedder;
use crate::prompt::retrieval_qa_prompt;
use crate::query_expansion::{IdentityQueryExpander, QueryExpander};
use crate::reranker::{LexicalOverlapReranker, Reranker};
use crate::retriever::{Retriever, SimilarityRetriever};
use crate::vector_store::VectorStore;
use crate::verifier::{AnswerVerifier, ContextGroundingVerifier};
use crate::RagError;

/// Per-ask diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskDiagnostics {
    /// Number of expanded queries retrieved for
    pub query_count: usize,
    /// Mean score of the final contexts (0.0 when none)
    pub avg_score: f32,
    /// Final per-context scores, in citation order
    pub scores: Vec<f32>,
}

/// Structured result of one `ask` invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskOutcome {
    pub answer: String,
    pub contexts: Vec<ScoredHit>,
    /// Context ids in final order
    pub citations: Vec<String>,
    pub diagnostics: AskDiagnostics,
    pub verification: VerificationResult,
}

/// The retrieval-QA orchestrator.
///
/// Defaults: dense similarity retrieval, lexical-overlap reranking, no
/// query expansion, structural grounding verification. Each collaborator
/// can be replaced through the `with_*` builders.
pub struct RetrievalQaChain {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    splitter: TextSplitter,
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    reranker: Arc<dyn Reranker>,
    expander: Arc<dyn QueryExpander>,
    verifier: Arc<dyn AnswerVerifier>,
}

impl RetrievalQaChain {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        splitter: TextSplitter,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        let retriever = Arc::new(SimilarityRetriever::new(embedder.clone(), store.clone()));
        Self {
            embedder,
            store,
            splitter,
            llm,
            retriever,
            reranker: Arc::new(LexicalOverlapReranker::default()),
            expander: Arc::new(IdentityQueryExpander),
            verifier: Arc::new(ContextGroundingVerifier),
        }
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn with_query_expander(mut self, expander: Arc<dyn QueryExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn AnswerVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Split, embed, and upsert documents into the store.
    pub async fn index(&self, documents: &[Document]) -> Result<(), RagError> {
        let chunks = self.splitter.split_documents(documents);
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let items: Vec<IndexedItem> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| IndexedItem {
                id: chunk.id,
                vector,
                text: chunk.text,
                metadata: chunk.metadata,
            })
            .collect();

        tracing::debug!(items = items.len(), "indexing chunks");
        self.store.upsert(items).await
    }

    /// Answer a question against the indexed corpus.
    ///
    /// Expanded queries retrieve strictly one after another; hits are
    /// merged by id keeping the maximum score observed across expansions,
    /// then reranked against the original question.
    pub async fn ask(
        &self,
        question: &str,
        k: usize,
        filters: &Filters,
        options: &GenerationOptions,
    ) -> Result<AskOutcome, RagError> {
        let expanded = self.expander.expand(question);

        let mut order: Vec<String> = Vec::new();
        let mut merged: HashMap<String, ScoredHit> = HashMap::new();
        for query in &expanded {
            let hits = self.retriever.retrieve(query, k, filters).await?;
            for hit in hits {
                match merged.get_mut(&hit.id) {
                    Some(existing) => {
                        if hit.score > existing.score {
                            *existing = hit;
                        }
                    }
                    None => {
                        order.push(hit.id.clone());
                        merged.insert(hit.id.clone(), hit);
                    }
                }
            }
        }

        let contexts: Vec<ScoredHit> = order
            .iter()
            .filter_map(|id| merged.remove(id))
            .collect();

        let mut contexts = self.reranker.rerank(question, contexts);
        contexts.truncate(k.max(1));

        let prompt = retrieval_qa_prompt(question, &contexts);
        let answer = self.llm.generate(&prompt, options).await?;

        let verification = self.verifier.verify(question, &answer, &contexts);
        let citations: Vec<String> = contexts.iter().map(|c| c.id.clone()).collect();
        let scores: Vec<f32> = contexts.iter().map(|c| c.score).collect();
        let avg_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        };

        tracing::debug!(
            question,
            queries = expanded.len(),
            contexts = contexts.len(),
            valid = verification.is_valid,
            "ask completed"
        );

        Ok(AskOutcome {
            answer,
            contexts,
            citations,
            diagnostics: AskDiagnostics {
                query_count: expanded.len(),
                avg_score,
                scores,
            },
            verification,
        })
    }

    /// Streaming variant: retrieve once (no expansion or verification),
    /// rerank, truncate, and stream the generator's fragments.
    ///
    /// The returned channel yields a finite, order-preserving fragment
    /// sequence; a generator without native streaming produces a single
    /// fragment with its full output. Dropping the receiver cancels.
    pub async fn ask_stream(
        &self,
        question: &str,
        k: usize,
        filters: &Filters,
        options: &GenerationOptions,
    ) -> Result<mpsc::Receiver<String>, RagError> {
        let contexts = self.retriever.retrieve(question, k, filters).await?;
        let mut contexts = self.reranker.rerank(question, contexts);
        contexts.truncate(k.max(1));

        let prompt = retrieval_qa_prompt(question, &contexts);
        let (tx, rx) = mpsc::channel(32);

        let llm = self.llm.clone();
        let options = options.clone();
        tokio::spawn(async move {
            if let Err(e) = llm.generate_stream(&prompt, &options, tx).await {
                tracing::warn!("streaming generation failed: {}", e);
            }
        });

        Ok(rx)
    }
}
