//! Generation client contract

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::LlmError;

/// Caller-supplied generation options, passed through to the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Backend-specific options
    #[serde(default)]
    pub extra: HashMap<String, Value>,
}

impl From<&docqa_config::GenerationSettings> for GenerationOptions {
    fn from(settings: &docqa_config::GenerationSettings) -> Self {
        Self {
            max_tokens: Some(settings.max_tokens),
            temperature: Some(settings.temperature),
            ..Default::default()
        }
    }
}

impl GenerationOptions {
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Generation client contract.
///
/// The streaming path sends text fragments through a channel; the sequence
/// is finite, order-preserving, and consumed once. Dropping the receiver
/// cancels further sends. Clients without a native streaming capability
/// inherit the default implementation, which emits the full batch output as
/// a single fragment.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a full response for the prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, LlmError>;

    /// Stream fragments of the response through `tx`
    async fn generate_stream(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        tx: mpsc::Sender<String>,
    ) -> Result<(), LlmError> {
        let text = self.generate(prompt, options).await?;
        // Receiver dropped means the caller cancelled; not an error.
        let _ = tx.send(text).await;
        Ok(())
    }

    /// Model name for logging
    fn model_name(&self) -> &str;
}
