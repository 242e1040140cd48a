mod api;
mod defaults;
mod embedding;
mod validation;

use crate::cli::{Args, Command};
use crate::error::{ChatbotError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use api::ApiConfig;
pub use defaults::*;
pub use embedding::{EmbeddingConfig, EmbeddingProvider, EmbeddingSettings};
pub use validation::{expand_env_var_in_string, normalize_chat_endpoint, parse_flag};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub addr: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of `.shopchat.yaml` (or `.yml` / `.json`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_endpoint: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub request_timeout: u64,
    pub dataset_path: PathBuf,
    pub embedding: EmbeddingSettings,
    pub top_k: usize,
    pub max_tool_rounds: usize,
    pub bind_addr: String,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::resolve(args, &file_config, |name| env::var(name).ok())
    }

    /// Merge the layers: CLI flag > environment > config file > default.
    pub fn resolve<F>(args: &Args, file: &FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("OPENROUTER_API_KEY");

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| var("SHOPCHAT_API_ENDPOINT"))
            .or_else(|| file.api.endpoint.clone())
            .map(|endpoint| normalize_chat_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| var("SHOPCHAT_MODEL"))
            .or_else(|| file.api.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let request_timeout = match var("SHOPCHAT_REQUEST_TIMEOUT") {
            Some(raw) => parse_number("SHOPCHAT_REQUEST_TIMEOUT", &raw)?,
            None => file.api.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };

        let dataset_path = args
            .dataset
            .clone()
            .or_else(|| var("DATASET_PATH").map(PathBuf::from))
            .or_else(|| file.dataset.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));

        let provider = match var("SHOPCHAT_EMBEDDING_PROVIDER") {
            Some(raw) => raw.parse::<EmbeddingProvider>().map_err(ChatbotError::ConfigError)?,
            None => file.embedding.provider.unwrap_or_default(),
        };

        // The embedding key falls back to the chat key, so one key serves
        // providers that offer both endpoints.
        let embedding = EmbeddingSettings {
            provider,
            endpoint: var("SHOPCHAT_EMBEDDING_ENDPOINT")
                .or_else(|| file.embedding.endpoint.clone())
                .unwrap_or_else(|| DEFAULT_EMBEDDING_ENDPOINT.to_string()),
            model: var("SHOPCHAT_EMBEDDING_MODEL")
                .or_else(|| file.embedding.model.clone())
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            api_key: var("SHOPCHAT_EMBEDDING_API_KEY")
                .or_else(|| file.embedding.api_key.as_deref().map(expand_env_var_in_string))
                .or_else(|| api_key.clone()),
            batch_size: file.embedding.batch_size.max(1),
            dimensions: file.embedding.dimensions.max(1),
        };

        let max_tool_rounds = match var("SHOPCHAT_MAX_TOOL_ROUNDS") {
            Some(raw) => parse_number::<usize>("SHOPCHAT_MAX_TOOL_ROUNDS", &raw)?,
            None => file.chat.max_tool_rounds,
        }
        .max(1);

        let serve_addr = match &args.command {
            Command::Serve { addr } => addr.clone(),
            _ => None,
        };
        let bind_addr = serve_addr
            .or_else(|| var("SHOPCHAT_ADDR"))
            .or_else(|| file.server.addr.clone())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let verbose = args.verbose
            || var("SHOPCHAT_VERBOSE")
                .map(|v| parse_flag(&v))
                .or(file.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            temperature: file.api.temperature,
            request_timeout,
            dataset_path,
            embedding,
            top_k: file.chat.top_k.max(1),
            max_tool_rounds,
            bind_addr,
            verbose,
        })
    }

    /// The chat API key, required by every command that talks to the model.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ChatbotError::ConfigError("OPENROUTER_API_KEY environment variable not set".to_string())
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ChatbotError::ConfigError(format!("{} must be a number, got '{}'", name, raw)))
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Ok(Self::load_from(&path)?);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".shopchat.yaml"),
            PathBuf::from(".shopchat.yml"),
            PathBuf::from(".shopchat.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("shopchat");
            paths.push(config_dir.join("shopchat.yaml"));
            paths.push(config_dir.join("shopchat.yml"));
            paths.push(config_dir.join("shopchat.json"));
        }

        paths
    }
}
