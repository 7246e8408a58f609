//! Ollama backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::client::{GenerationOptions, LlmClient};
use crate::LlmError;

/// Ollama configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

impl From<&docqa_config::GenerationSettings> for OllamaConfig {
    fn from(settings: &docqa_config::GenerationSettings) -> Self {
        Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            ..Default::default()
        }
    }
}

/// Ollama chat client
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn chat_request(&self, prompt: &str, options: &GenerationOptions, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream,
            options: Some(WireOptions {
                temperature: options.temperature,
                top_p: options.top_p,
                num_predict: options.max_tokens.map(|n| n as i32),
            }),
        }
    }

    async fn execute_request(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let url = self.api_url("/chat");
        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(LlmError::Network(format!("Server error {}: {}", status, error)));
            }
            return Err(LlmError::Api(error));
        }

        response.json().await.map_err(|e| LlmError::InvalidResponse {
            url,
            reason: e.to_string(),
        })
    }

    fn is_retryable(error: &LlmError) -> bool {
        matches!(error, LlmError::Network(_))
    }

    /// Check whether the endpoint is reachable
    pub async fn is_available(&self) -> bool {
        self.client
            .get(format!(
                "{}/api/tags",
                self.config.endpoint.trim_end_matches('/')
            ))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    /// Generate a response, retrying transient failures with exponential
    /// backoff.
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let request = self.chat_request(prompt, options, false);

        let mut last_error = None;
        let mut backoff = self.config.initial_backoff;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "Generation request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(&request).await {
                Ok(result) => return Ok(result.message.content),
                Err(e) if Self::is_retryable(&e) => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("Max retries exceeded".to_string())))
    }

    /// Stream NDJSON chat fragments as they arrive.
    async fn generate_stream(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        tx: mpsc::Sender<String>,
    ) -> Result<(), LlmError> {
        use futures::StreamExt;

        let request = self.chat_request(prompt, options, true);
        let url = self.api_url("/chat");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(error));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            // Each NDJSON line is a complete chunk object; keep any
            // trailing partial line in the buffer.
            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].trim().to_string();
                buffer.drain(..=pos);
                if line.is_empty() {
                    continue;
                }

                if let Ok(chunk) = serde_json::from_str::<StreamChunk>(&line) {
                    if tx.send(chunk.message.content).await.is_err() {
                        // Receiver dropped: the caller cancelled.
                        tracing::debug!("stream receiver dropped, stopping generation");
                        return Ok(());
                    }
                    if chunk.done {
                        return Ok(());
                    }
                }
            }
        }

        Ok(())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<WireOptions>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct WireOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    message: WireMessage,
    #[serde(default)]
    done: bool,
}
