use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults::{default_batch_size, default_hashing_dimensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// OpenAI-compatible `/embeddings` endpoint.
    #[default]
    Remote,
    /// Local feature hashing; no network.
    Hashing,
}

impl FromStr for EmbeddingProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(EmbeddingProvider::Remote),
            "hashing" => Ok(EmbeddingProvider::Hashing),
            other => Err(format!(
                "unknown embedding provider '{}' (expected 'remote' or 'hashing')",
                other
            )),
        }
    }
}

impl fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProvider::Remote => write!(f, "remote"),
            EmbeddingProvider::Hashing => write!(f, "hashing"),
        }
    }
}

/// `embedding:` section of the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: Option<EmbeddingProvider>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_hashing_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: None,
            endpoint: None,
            model: None,
            api_key: None,
            batch_size: default_batch_size(),
            dimensions: default_hashing_dimensions(),
        }
    }
}

/// Resolved embedding settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub dimensions: usize,
}
