//! Single-shot tool-calling agent
//!
//! Parses a minimal textual protocol — `tool:<name> {"arg":"value"}` —
//! from one instruction string and invokes the named tool once. No
//! iteration, no decision model.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use docqa_tools::ToolRegistry;

use crate::AgentError;

fn protocol_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^tool:([a-zA-Z0-9_\-]+)\s*(\{.*\})?$").unwrap())
}

pub struct ToolCallingAgent {
    tools: ToolRegistry,
    agent_name: String,
    agent_features: Vec<String>,
    system_prompt: Option<String>,
}

impl ToolCallingAgent {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools,
            agent_name: "ToolCallingAgent".to_string(),
            agent_features: Vec::new(),
            system_prompt: None,
        }
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.agent_features = features;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn system_prompt(&self) -> String {
        if let Some(prompt) = &self.system_prompt {
            let trimmed = prompt.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }

        let name = self.agent_name.trim();
        let mut lines = vec![
            format!(
                "You are {}.",
                if name.is_empty() { "ToolCallingAgent" } else { name }
            ),
            "You execute explicitly requested tool calls using the protocol: tool:TOOL_NAME {\"key\":\"value\"}."
                .to_string(),
        ];

        let features: Vec<&str> = self
            .agent_features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if !features.is_empty() {
            lines.push("Agent features:".to_string());
            for feature in features {
                lines.push(format!("- {}", feature));
            }
        }

        lines.join("\n")
    }

    /// Hint returned when the instruction does not match the protocol.
    pub fn invocation_guide(&self) -> String {
        "No tool invocation detected. Use: tool:TOOL_NAME {\"arg\":\"value\"}".to_string()
    }

    /// Parse the instruction and invoke the named tool once.
    ///
    /// Non-matching instructions yield the usage hint and unknown tools an
    /// `Unknown tool:` string; only malformed JSON arguments and failed
    /// invocations are errors.
    pub async fn run(&self, instruction: &str) -> Result<String, AgentError> {
        let captures = match protocol_pattern().captures(instruction.trim()) {
            Some(captures) => captures,
            None => return Ok(self.invocation_guide()),
        };

        let name = &captures[1];
        let payload = captures.get(2).map(|m| m.as_str()).unwrap_or("{}");

        let tool = match self.tools.get(name) {
            Some(tool) => tool,
            None => return Ok(format!("Unknown tool: {}", name)),
        };

        let input: Map<String, Value> = serde_json::from_str(payload)
            .map_err(|e| AgentError::MalformedArguments(e.to_string()))?;

        tracing::debug!(tool = name, "single-shot tool invocation");
        tool.invoke(&Value::Object(input))
            .await
            .map_err(|e| AgentError::Tool(e.to_string()))
    }
}
