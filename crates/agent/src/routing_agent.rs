//! Bounded tool-routing agent loop

use std::sync::Arc;

use serde_json::{Map, Value};

use docqa_llm::Message;
use docqa_tools::ToolRegistry;

use crate::decision::RoutingDecision;
use crate::models::ToolRoutingModel;
use crate::AgentError;

const MAX_ITERATIONS_SENTINEL: &str = "Max iterations reached without final answer.";

/// One recorded tool invocation (including failed lookups, whose output is
/// the error string).
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    pub input: Map<String, Value>,
    pub output: String,
}

/// Result of one `chat` invocation
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub answer: String,
    /// Iterations consumed (equals `max_iterations` on exhaustion)
    pub iterations: usize,
    pub tool_calls: Vec<ToolCallRecord>,
    /// Full message trace accumulated during the loop
    pub trace: Vec<Message>,
}

/// Iterative agent: a routing model repeatedly chooses between calling a
/// named tool and emitting the final answer, up to `max_iterations`.
///
/// Unknown tool names and failed invocations become tool-output strings so
/// the model can react; they never abort the conversation. Exhausting the
/// iteration budget is a designed termination that returns a sentinel
/// answer with the accumulated trace.
pub struct ToolRoutingAgent {
    model: Arc<dyn ToolRoutingModel>,
    tools: ToolRegistry,
    max_iterations: usize,
    agent_name: String,
    agent_features: Vec<String>,
    system_prompt: Option<String>,
}

impl ToolRoutingAgent {
    pub fn new(model: Arc<dyn ToolRoutingModel>, tools: ToolRegistry) -> Self {
        Self {
            model,
            tools,
            max_iterations: 8,
            agent_name: "ToolRoutingAgent".to_string(),
            agent_features: Vec::new(),
            system_prompt: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
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

    /// The system prompt: explicit if configured, otherwise derived from
    /// the agent name and feature list.
    pub fn system_prompt(&self) -> String {
        if let Some(prompt) = &self.system_prompt {
            let trimmed = prompt.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }

        let name = self.agent_name.trim();
        let features: Vec<&str> = self
            .agent_features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();

        if name == "ToolRoutingAgent" && features.is_empty() {
            return "You are a tool-using agent. Decide whether to call a tool or answer directly."
                .to_string();
        }

        let mut lines = vec![
            format!(
                "You are {}, a tool-using agent.",
                if name.is_empty() { "ToolRoutingAgent" } else { name }
            ),
            "Decide whether to call a tool or answer directly.".to_string(),
        ];

        if !features.is_empty() {
            lines.push("Agent features:".to_string());
            for feature in features {
                lines.push(format!("- {}", feature));
            }
        }

        lines.join("\n")
    }

    /// Run the bounded decision loop for one user message.
    pub async fn chat(&self, user_message: &str) -> Result<ChatOutcome, AgentError> {
        let mut messages = vec![
            Message::system(self.system_prompt()),
            Message::user(user_message),
        ];

        let schemas = self.tools.schemas();
        let mut calls: Vec<ToolCallRecord> = Vec::new();

        for i in 0..self.max_iterations {
            let decision = self.model.respond(&messages, &schemas).await?;

            match decision {
                RoutingDecision::Final { content } => {
                    tracing::debug!(iterations = i + 1, tool_calls = calls.len(), "final answer");
                    return Ok(ChatOutcome {
                        answer: content,
                        iterations: i + 1,
                        tool_calls: calls,
                        trace: messages,
                    });
                }
                RoutingDecision::Invalid => {
                    messages.push(Message::assistant(
                        "Invalid decision type; provide final answer.",
                    ));
                    continue;
                }
                RoutingDecision::ToolCall { tool, input } => {
                    let output = match self.tools.get(&tool) {
                        None => {
                            tracing::warn!(tool = %tool, "routing model chose unknown tool");
                            format!("Tool not found: {}", tool)
                        }
                        Some(t) => t
                            .invoke(&Value::Object(input.clone()))
                            .await
                            .unwrap_or_else(|e| format!("Tool error: {}", e)),
                    };

                    let input_json = Value::Object(input.clone()).to_string();
                    messages.push(Message::assistant(format!(
                        "TOOL_CALL {} {}",
                        tool, input_json
                    )));
                    messages.push(Message::tool(output.clone()));

                    calls.push(ToolCallRecord {
                        name: tool,
                        input,
                        output,
                    });
                }
            }
        }

        tracing::debug!(
            iterations = self.max_iterations,
            tool_calls = calls.len(),
            "iteration budget exhausted"
        );
        Ok(ChatOutcome {
            answer: MAX_ITERATIONS_SENTINEL.to_string(),
            iterations: self.max_iterations,
            tool_calls: calls,
            trace: messages,
        })
    }
}
