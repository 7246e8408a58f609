//! Routing decisions and their textual parsing

use serde_json::{Map, Value};

/// What the routing model decided to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    /// Emit the final answer and stop
    Final { content: String },
    /// Invoke a named tool with a free-form argument object
    ToolCall {
        tool: String,
        input: Map<String, Value>,
    },
    /// Unusable decision; the agent appends a corrective message and
    /// continues
    Invalid,
}

impl RoutingDecision {
    pub fn final_answer(content: impl Into<String>) -> Self {
        Self::Final {
            content: content.into(),
        }
    }

    pub fn tool_call(tool: impl Into<String>, input: Map<String, Value>) -> Self {
        Self::ToolCall {
            tool: tool.into(),
            input,
        }
    }
}

/// Parse a model's raw text into a routing decision.
///
/// Accepts `{"type":"tool_call","tool":"name","input":{...}}` and
/// `{"type":"final","content":"..."}`, tolerating Markdown code fences.
/// Anything unparsable, of an unknown type, or naming an empty tool
/// degrades to `Final` carrying the raw text — a model that refuses to
/// speak the protocol still produces an answer.
pub fn parse_decision(raw: &str) -> RoutingDecision {
    let mut clean = raw.trim();
    if let Some(stripped) = clean.strip_prefix("```json").or_else(|| clean.strip_prefix("```")) {
        clean = stripped.trim_start();
    }
    if let Some(stripped) = clean.strip_suffix("```") {
        clean = stripped.trim_end();
    }

    let decoded: Value = match serde_json::from_str(clean) {
        Ok(value) => value,
        Err(_) => return RoutingDecision::final_answer(raw),
    };

    let decision_type = decoded
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("final");

    match decision_type {
        "tool_call" => {
            let tool = decoded
                .get("tool")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if tool.is_empty() {
                return RoutingDecision::final_answer(raw);
            }

            let input = decoded
                .get("input")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            RoutingDecision::tool_call(tool, input)
        }
        _ => {
            let content = decoded
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| raw.to_string());
            RoutingDecision::Final { content }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_call() {
        let decision =
            parse_decision(r#"{"type":"tool_call","tool":"weather","input":{"lat":1.5}}"#);

        match decision {
            RoutingDecision::ToolCall { tool, input } => {
                assert_eq!(tool, "weather");
                assert_eq!(input["lat"], 1.5);
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_parse_final() {
        let decision = parse_decision(r#"{"type":"final","content":"all done"}"#);
        assert_eq!(decision, RoutingDecision::final_answer("all done"));
    }

    #[test]
    fn test_strips_code_fences() {
        let raw = "```json\n{\"type\":\"final\",\"content\":\"fenced\"}\n```";
        assert_eq!(parse_decision(raw), RoutingDecision::final_answer("fenced"));
    }

    #[test]
    fn test_plain_text_becomes_final() {
        let decision = parse_decision("I think the answer is 42.");
        assert_eq!(
            decision,
            RoutingDecision::final_answer("I think the answer is 42.")
        );
    }

    #[test]
    fn test_empty_tool_name_degrades_to_final() {
        let raw = r#"{"type":"tool_call","tool":"","input":{}}"#;
        assert_eq!(parse_decision(raw), RoutingDecision::final_answer(raw));
    }

    #[test]
    fn test_unknown_type_uses_content_or_raw() {
        let decision = parse_decision(r#"{"type":"mystery","content":"still usable"}"#);
        assert_eq!(decision, RoutingDecision::final_answer("still usable"));

        let raw = r#"{"type":"mystery"}"#;
        assert_eq!(parse_decision(raw), RoutingDecision::final_answer(raw));
    }

    #[test]
    fn test_missing_input_defaults_to_empty_object() {
        let decision = parse_decision(r#"{"type":"tool_call","tool":"math"}"#);
        match decision {
            RoutingDecision::ToolCall { input, .. } => assert!(input.is_empty()),
            other => panic!("unexpected decision: {:?}", other),
        }
    }
}
