//! Tools callable by the docqa agents
//!
//! Implements the tool contract (name, description, string-in/string-out
//! invocation) plus a registry for lookup and schema listing, and a small
//! set of built-in tools.

pub mod registry;
pub mod retrieval_qa;
pub mod tool;
pub mod weather;

pub use registry::{ToolRegistry, ToolSchema};
pub use retrieval_qa::RetrievalQaTool;
pub use tool::Tool;
pub use weather::WeatherTool;

use thiserror::Error;

/// Tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<ToolError> for docqa_core::Error {
    fn from(err: ToolError) -> Self {
        docqa_core::Error::Tool(err.to_string())
    }
}
