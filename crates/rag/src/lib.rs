//! Retrieval-augmented answering for the docqa pipeline
//!
//! Features:
//! - Embedder contract with a deterministic hash embedder
//! - Vector store contract with in-memory and JSON-file stores
//! - Dense and hybrid (dense + lexical) retrieval
//! - Lexical-overlap reranking
//! - Naive query expansion
//! - Answer grounding verification
//! - The retrieval-QA chain composing all of the above
//! - Vector index snapshot persistence

pub mod chain;
pub mod embeddings;
pub mod json_store;
pub mod persistence;
pub mod prompt;
pub mod query_expansion;
pub mod reranker;
pub mod retriever;
pub mod vector_store;
pub mod verifier;

pub use chain::{AskDiagnostics, AskOutcome, RetrievalQaChain};
pub use embeddings::{Embedder, HashEmbedder};
pub use json_store::JsonFileVectorStore;
pub use persistence::{load_index, save_index};
pub use prompt::retrieval_qa_prompt;
pub use query_expansion::{IdentityQueryExpander, QueryExpander, SimpleQueryExpander};
pub use reranker::{LexicalOverlapReranker, Reranker};
pub use retriever::{HybridConfig, HybridRetriever, Retriever, SimilarityRetriever};
pub use vector_store::{InMemoryVectorStore, PersistableVectorStore, VectorStore};
pub use verifier::{AnswerVerifier, ContextGroundingVerifier};

use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Vector index file not found: {0}")]
    NotFound(String),

    #[error("Persistence error for {path}: {reason}")]
    Persistence { path: String, reason: String },
}

impl From<docqa_llm::LlmError> for RagError {
    fn from(err: docqa_llm::LlmError) -> Self {
        RagError::Generation(err.to_string())
    }
}

impl From<RagError> for docqa_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Persistence { .. } | RagError::NotFound(_) => {
                docqa_core::Error::Persistence(err.to_string())
            }
            other => docqa_core::Error::Retrieval(other.to_string()),
        }
    }
}
