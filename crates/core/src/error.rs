//! Central error type and verification result

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias using the central error type
pub type Result<T> = std::result::Result<T, Error>;

/// Central error type; per-crate errors convert into it at crate seams.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text processing error: {0}")]
    Text(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Outcome of checking that an answer is plausibly grounded in retrieved
/// evidence. Necessary but not sufficient: no semantic comparison is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// True iff no issues were raised
    pub is_valid: bool,
    /// Issues in the order they were detected
    pub issues: Vec<String>,
}

impl VerificationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            issues: Vec::new(),
        }
    }

    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }
}
