use serde::{Deserialize, Serialize};

/// `api:` section of the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub request_timeout: Option<u64>,
    #[serde(default)]
    pub temperature: Option<f32>,
}
