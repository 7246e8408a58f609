//! JSON-over-HTTP transport shared by API-backed clients

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::LlmError;

/// Single-operation HTTP transport: POST a JSON body, decode a JSON reply.
///
/// Every request carries `Content-Type: application/json` and the
/// configured timeout. Transport failures, non-2xx statuses, and decode
/// failures all surface as errors naming the URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// POST `body` as JSON to `url` with extra `headers`, returning the
    /// decoded JSON response.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
    ) -> Result<Value, LlmError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|_| LlmError::Http(url.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(url, %status, "JSON POST returned error status");
            return Err(LlmError::Http(url.to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        // 60s matches the default outbound budget of the API clients.
        Self::new(Duration::from_secs(60)).unwrap_or_else(|_| Self {
            client: Client::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_url_names_url() {
        let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();
        let err = transport
            .post_json(
                "http://127.0.0.1:1/never",
                &HashMap::new(),
                &serde_json::json!({}),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("http://127.0.0.1:1/never"));
    }
}
