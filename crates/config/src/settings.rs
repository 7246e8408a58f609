//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Generation configuration
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Snapshot configuration
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

/// Retrieval-stage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Final number of contexts per question
    pub top_k: usize,
    /// Weight of the dense score in hybrid fusion (0.0 - 1.0)
    pub dense_weight: f32,
    /// Weight of the original score when reranking (0.0 - 1.0)
    pub base_score_weight: f32,
    /// Maximum expanded queries per question
    pub max_queries: usize,
    /// Chunk size in characters
    pub chunk_size: usize,
    /// Chunk overlap in characters
    pub chunk_overlap: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            dense_weight: 0.7,
            base_score_weight: 0.7,
            max_queries: 3,
            chunk_size: 800,
            chunk_overlap: 120,
        }
    }
}

/// Generation settings for the external LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            timeout_secs: 60,
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

/// Vector index snapshot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Path of the snapshot file
    pub path: String,
    /// Load the snapshot at startup if the file exists
    pub load_on_start: bool,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            path: "data/vector_index.json".to_string(),
            load_on_start: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file with `DOCQA_*` environment
    /// overrides layered on top (e.g. `DOCQA_RETRIEVAL__TOP_K=10`).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("DOCQA").separator("__"));

        let settings: Settings = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be positive".to_string()));
        }
        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(ConfigError::Invalid(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retrieval.dense_weight) {
            return Err(ConfigError::Invalid(
                "dense_weight must be within 0.0..=1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retrieval.base_score_weight) {
            return Err(ConfigError::Invalid(
                "base_score_weight must be within 0.0..=1.0".to_string(),
            ));
        }
        Ok(())
    }
}
