//! Weather lookup tool

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::Tool;
use crate::ToolError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetches current weather from Open-Meteo by latitude/longitude.
///
/// Network failures come back as explanatory output rather than errors, so
/// a routing model can recover.
pub struct WeatherTool {
    base_url: String,
    client: reqwest::Client,
}

impl WeatherTool {
    pub fn new() -> Self {
        Self::with_base_url("https://api.open-meteo.com/v1/forecast")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Fetches current weather from Open-Meteo using latitude/longitude."
    }

    async fn invoke(&self, input: &Value) -> Result<String, ToolError> {
        let lat = input.get("lat").and_then(Value::as_f64).unwrap_or(0.0);
        let lon = input.get("lon").and_then(Value::as_f64).unwrap_or(0.0);

        let url = format!(
            "{}?latitude={}&longitude={}&current_weather=true",
            self.base_url.trim_end_matches('/'),
            lat,
            lon
        );

        let response = match self.client.get(&url).timeout(FETCH_TIMEOUT).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "weather fetch returned error status");
                return Ok("WeatherTool: failed to fetch weather data.".to_string());
            }
            Err(e) => {
                tracing::warn!("weather fetch failed: {}", e);
                return Ok("WeatherTool: failed to fetch weather data.".to_string());
            }
        };

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let current = payload.get("current_weather").cloned().unwrap_or(json!({}));

        serde_json::to_string(&json!({
            "lat": lat,
            "lon": lon,
            "current_weather": current,
        }))
        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }
}
