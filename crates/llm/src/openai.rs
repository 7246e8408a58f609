//! OpenAI-compatible chat-completions backend

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::client::{GenerationOptions, LlmClient};
use crate::transport::HttpTransport;
use crate::LlmError;

/// OpenAI-compatible configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Model name/ID
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
        }
    }
}

/// Chat-completions client over the shared JSON transport.
pub struct OpenAiClient {
    config: OpenAiConfig,
    transport: HttpTransport,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            transport: HttpTransport::default(),
        }
    }

    /// Use a custom transport (e.g. a shorter timeout)
    pub fn with_transport(mut self, transport: HttpTransport) -> Self {
        self.transport = transport;
        self
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.api_key),
        );
        headers
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let mut body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(top_p) = options.top_p {
            body["top_p"] = json!(top_p);
        }

        let response = self.transport.post_json(&url, &self.headers(), &body).await?;

        let content = response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Ok(content.to_string())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let client = OpenAiClient::new(OpenAiConfig {
            api_key: "sk-test".to_string(),
            ..Default::default()
        });

        assert_eq!(client.headers()["Authorization"], "Bearer sk-test");
    }

    #[test]
    fn test_model_name() {
        let client = OpenAiClient::new(OpenAiConfig::default());
        assert_eq!(client.model_name(), "gpt-4o-mini");
    }
}
