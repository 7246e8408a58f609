//! Tool-using agents for the docqa pipeline
//!
//! Features:
//! - Routing decision contract and JSON decision parsing
//! - Deterministic heuristic router and an Ollama-backed router
//! - Bounded iterative tool-routing agent with a full message trace
//! - Single-shot tool-calling agent with a minimal textual protocol

pub mod calling_agent;
pub mod decision;
pub mod models;
pub mod routing_agent;

pub use calling_agent::ToolCallingAgent;
pub use decision::{parse_decision, RoutingDecision};
pub use models::{HeuristicRoutingModel, OllamaRoutingModel, ToolRoutingModel};
pub use routing_agent::{ChatOutcome, ToolCallRecord, ToolRoutingAgent};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Malformed tool arguments: {0}")]
    MalformedArguments(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<docqa_tools::ToolError> for AgentError {
    fn from(err: docqa_tools::ToolError) -> Self {
        AgentError::Tool(err.to_string())
    }
}

impl From<docqa_llm::LlmError> for AgentError {
    fn from(err: docqa_llm::LlmError) -> Self {
        AgentError::Llm(err.to_string())
    }
}

impl From<AgentError> for docqa_core::Error {
    fn from(err: AgentError) -> Self {
        docqa_core::Error::Agent(err.to_string())
    }
}
