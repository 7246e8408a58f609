//! Routing decision models

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Map, Value};

use docqa_llm::{HttpTransport, Message, Role};
use docqa_tools::ToolSchema;

use crate::decision::{parse_decision, RoutingDecision};
use crate::AgentError;

/// Decides, given the conversation so far and the available tools, whether
/// to call a tool or emit the final answer.
#[async_trait]
pub trait ToolRoutingModel: Send + Sync {
    async fn respond(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<RoutingDecision, AgentError>;
}

/// Local fallback router for deterministic demos and tests.
///
/// A pending tool output becomes the final answer; otherwise the last user
/// message is routed by surface features (math expressions, weather
/// phrasing), falling back to retrieval QA when available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRoutingModel;

fn math_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[0-9].*[\+\-\*/\^]|sin\(|cos\(|tan\(|sqrt\(").unwrap()
    })
}

fn expression_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([0-9\s\+\-\*/\^\(\)\.]+|(?:sin|cos|tan|sqrt|log|ln|exp|pow|min|max)\([^\)]+\))")
            .unwrap()
    })
}

impl HeuristicRoutingModel {
    pub fn new() -> Self {
        Self
    }

    fn has_tool(tools: &[ToolSchema], name: &str) -> bool {
        tools.iter().any(|tool| tool.name == name)
    }

    fn extract_expression(text: &str) -> String {
        expression_pattern()
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| text.to_string())
    }
}

#[async_trait]
impl ToolRoutingModel for HeuristicRoutingModel {
    async fn respond(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<RoutingDecision, AgentError> {
        let mut last_user = String::new();
        let mut last_tool_output: Option<&str> = None;

        for msg in messages.iter().rev() {
            if last_tool_output.is_none() && msg.role == Role::Tool {
                last_tool_output = Some(&msg.content);
            }
            if msg.role == Role::User {
                last_user = msg.content.to_lowercase();
                break;
            }
        }

        if let Some(output) = last_tool_output.filter(|o| !o.is_empty()) {
            return Ok(RoutingDecision::final_answer(format!(
                "Tool result: {}",
                output
            )));
        }

        if Self::has_tool(tools, "math") && math_pattern().is_match(&last_user) {
            let mut input = Map::new();
            input.insert(
                "expression".to_string(),
                json!(Self::extract_expression(&last_user)),
            );
            return Ok(RoutingDecision::tool_call("math", input));
        }

        if Self::has_tool(tools, "weather")
            && (last_user.contains("weather") || last_user.contains("temperature"))
        {
            let mut input = Map::new();
            input.insert("lat".to_string(), json!(-15.3875));
            input.insert("lon".to_string(), json!(28.3228));
            return Ok(RoutingDecision::tool_call("weather", input));
        }

        if Self::has_tool(tools, "rag_qa") {
            let mut input = Map::new();
            input.insert("question".to_string(), json!(last_user));
            input.insert("k".to_string(), json!(3));
            return Ok(RoutingDecision::tool_call("rag_qa", input));
        }

        Ok(RoutingDecision::final_answer("No suitable tool found."))
    }
}

/// Ollama-backed router speaking a strict JSON protocol.
pub struct OllamaRoutingModel {
    model: String,
    base_url: String,
    transport: HttpTransport,
}

impl OllamaRoutingModel {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: base_url.into(),
            transport: HttpTransport::default(),
        }
    }

    pub fn with_transport(mut self, transport: HttpTransport) -> Self {
        self.transport = transport;
        self
    }

    fn controller_prompt(tools: &[ToolSchema]) -> String {
        let tool_lines: Vec<String> = tools
            .iter()
            .map(|tool| format!("- {}: {}", tool.name, tool.description))
            .collect();

        format!(
            "You are a strict tool-routing controller.\n\
             Available tools:\n{}\n\n\
             Return JSON only:\n\
             {{\"type\":\"tool_call\",\"tool\":\"name\",\"input\":{{...}}}} OR {{\"type\":\"final\",\"content\":\"...\"}}.",
            tool_lines.join("\n")
        )
    }

    /// Map the agent trace onto provider roles; tool outputs travel as
    /// assistant `TOOL_RESULT:` messages since the provider has no tool
    /// role.
    fn to_provider_messages(messages: &[Message], tools: &[ToolSchema]) -> Vec<Value> {
        let mut out = vec![json!({
            "role": "system",
            "content": Self::controller_prompt(tools),
        })];

        for msg in messages {
            match msg.role {
                Role::Tool => out.push(json!({
                    "role": "assistant",
                    "content": format!("TOOL_RESULT: {}", msg.content),
                })),
                role => out.push(json!({
                    "role": role.to_string(),
                    "content": msg.content,
                })),
            }
        }

        out
    }
}

#[async_trait]
impl ToolRoutingModel for OllamaRoutingModel {
    async fn respond(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<RoutingDecision, AgentError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "stream": false,
            "messages": Self::to_provider_messages(messages, tools),
        });

        let response = self
            .transport
            .post_json(&url, &Default::default(), &body)
            .await?;

        let content = response
            .pointer("/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(parse_decision(content))
    }
}
