use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    /// The model asked for a tool that is not registered.
    #[error("Routing failure: model requested unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Tool-call limit exceeded: more than {0} tool rounds in a single turn")]
    ToolRoundLimit(usize),

    #[error("Capability unavailable: {0}")]
    CapabilityError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl ChatbotError {
    /// True when an external capability (model, embeddings, network) failed.
    /// The core never retries these; the calling shell decides.
    pub fn is_capability_failure(&self) -> bool {
        matches!(
            self,
            ChatbotError::ApiError { .. }
                | ChatbotError::CapabilityError(_)
                | ChatbotError::NetworkError(_)
                | ChatbotError::Timeout
        )
    }

    pub fn is_routing_failure(&self) -> bool {
        matches!(
            self,
            ChatbotError::UnknownTool(_) | ChatbotError::ToolRoundLimit(_)
        )
    }
}

impl From<anyhow::Error> for ChatbotError {
    fn from(err: anyhow::Error) -> Self {
        ChatbotError::ConfigError(format!("{:#}", err))
    }
}

impl From<String> for ChatbotError {
    fn from(msg: String) -> Self {
        ChatbotError::Other(msg)
    }
}

impl From<&str> for ChatbotError {
    fn from(msg: &str) -> Self {
        ChatbotError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatbotError>;
