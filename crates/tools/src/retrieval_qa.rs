//! Retrieval-QA tool
//!
//! Exposes the retrieval-QA chain as an agent-callable tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use docqa_core::Filters;
use docqa_llm::GenerationOptions;
use docqa_rag::RetrievalQaChain;

use crate::tool::Tool;
use crate::ToolError;

const DEFAULT_K: usize = 3;

/// Answers questions against the indexed corpus.
///
/// Input: `{"question": "...", "k": 3}` — `k` optional.
pub struct RetrievalQaTool {
    chain: Arc<RetrievalQaChain>,
}

impl RetrievalQaTool {
    pub fn new(chain: Arc<RetrievalQaChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Tool for RetrievalQaTool {
    fn name(&self) -> &str {
        "rag_qa"
    }

    fn description(&self) -> &str {
        "Answer questions using retrieval-augmented generation."
    }

    async fn invoke(&self, input: &Value) -> Result<String, ToolError> {
        let question = input
            .get("question")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if question.is_empty() {
            return Ok("Missing required field: question".to_string());
        }

        let k = input
            .get("k")
            .and_then(Value::as_u64)
            .map(|k| k as usize)
            .unwrap_or(DEFAULT_K);

        let outcome = self
            .chain
            .ask(question, k, &Filters::new(), &GenerationOptions::default())
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        Ok(outcome.answer)
    }
}
