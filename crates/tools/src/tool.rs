//! Tool contract

use async_trait::async_trait;
use serde_json::Value;

use crate::ToolError;

/// A named capability an agent can invoke.
///
/// Input is a free-form JSON object; output is text the routing model can
/// read. Tools are expected to degrade gracefully: recoverable problems
/// (missing fields, failed fetches) should come back as explanatory output
/// strings so the conversation can continue, reserving `ToolError` for
/// genuinely unusable invocations.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name used for lookup
    fn name(&self) -> &str;

    /// One-line description shown to the routing model
    fn description(&self) -> &str;

    /// Invoke the tool with a JSON argument object
    async fn invoke(&self, input: &Value) -> Result<String, ToolError>;
}
