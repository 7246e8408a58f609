//! LLM integration for the docqa pipeline
//!
//! Features:
//! - Generation client contract with batch and streaming paths
//! - Ollama backend (non-streaming and NDJSON incremental)
//! - OpenAI-compatible backend over a shared JSON transport
//! - Deterministic echo client for tests and offline runs

pub mod client;
pub mod echo;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod transport;

pub use client::{GenerationOptions, LlmClient};
pub use echo::EchoClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::{Message, Role};
pub use transport::HttpTransport;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("HTTP POST failed for URL: {0}")]
    Http(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for docqa_core::Error {
    fn from(err: LlmError) -> Self {
        docqa_core::Error::Llm(err.to_string())
    }
}
