//! Deterministic echo client for tests and offline runs

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::client::{GenerationOptions, LlmClient};
use crate::LlmError;

const PROMPT_HEAD_CHARS: usize = 240;
const STREAM_FRAGMENT_CHARS: usize = 40;

/// Echoes the head of the prompt back, prefixed.
///
/// The prefix defaults to `ECHO` and can be overridden via
/// `options.extra["prefix"]`. Streaming yields the same output in
/// 40-character fragments.
#[derive(Debug, Clone, Default)]
pub struct EchoClient;

impl EchoClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for EchoClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let prefix = options
            .extra
            .get("prefix")
            .and_then(Value::as_str)
            .unwrap_or("ECHO");

        let head: String = prompt.chars().take(PROMPT_HEAD_CHARS).collect();
        Ok(format!("{}: {}", prefix, head))
    }

    async fn generate_stream(
        &self,
        prompt: &str,
        options: &GenerationOptions,
        tx: mpsc::Sender<String>,
    ) -> Result<(), LlmError> {
        let text = self.generate(prompt, options).await?;

        let chars: Vec<char> = text.chars().collect();
        for fragment in chars.chunks(STREAM_FRAGMENT_CHARS) {
            let piece: String = fragment.iter().collect();
            if tx.send(piece).await.is_err() {
                return Ok(());
            }
        }

        Ok(())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_prefix_and_truncation() {
        let client = EchoClient::new();
        let prompt = "x".repeat(500);

        let out = client
            .generate(&prompt, &GenerationOptions::default())
            .await
            .unwrap();

        assert!(out.starts_with("ECHO: "));
        assert_eq!(out.len(), "ECHO: ".len() + 240);
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let client = EchoClient::new();
        let options =
            GenerationOptions::default().with_extra("prefix", serde_json::json!("ANSWER"));

        let out = client.generate("question", &options).await.unwrap();
        assert_eq!(out, "ANSWER: question");
    }

    #[tokio::test]
    async fn test_stream_fragments() {
        let client = EchoClient::new();
        let prompt = "a".repeat(100);
        let (tx, mut rx) = mpsc::channel(16);

        client
            .generate_stream(&prompt, &GenerationOptions::default(), tx)
            .await
            .unwrap();

        let mut fragments = Vec::new();
        while let Some(piece) = rx.recv().await {
            fragments.push(piece);
        }

        // "ECHO: " + 100 chars = 106 chars -> 40 + 40 + 26
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].len(), 40);
        assert_eq!(fragments.concat(), format!("ECHO: {}", prompt));
    }
}
