pub mod resolve;

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CadenceConfig {
    #[serde(default)]
    pub descriptors: DescriptorsConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescriptorsConfig {
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub strict: bool,
}

impl Default for DescriptorsConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub parallel: Option<usize>,
}

fn default_patterns() -> Vec<String> {
    vec![
        "**/project.toml".to_string(),
        "**/project.json".to_string(),
    ]
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
