//! Runtime configuration for the docqa pipeline
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `DOCQA_*` environment variables.

pub mod settings;

pub use settings::{
    GenerationSettings, RetrievalSettings, RuntimeEnvironment, Settings, SnapshotSettings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}
