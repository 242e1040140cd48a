use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::models::RequestBody;
use super::response::parse_reply;
use super::{LanguageModel, ModelReply};
use crate::error::{ChatbotError, Result};
use crate::models::Message;

/// OpenAI-compatible chat-completions provider (OpenRouter by default).
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: Option<f32>,
}

impl ChatCompletionsClient {
    pub fn new(
        api_key: &str,
        endpoint: &str,
        model: &str,
        temperature: Option<f32>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ChatbotError::ConfigError(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    async fn make_api_request(&self, request_body: &RequestBody<'_>) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatbotError::Timeout
                } else {
                    ChatbotError::NetworkError(e)
                }
            })?;

        debug!(status = %response.status(), "Model response status");

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChatbotError::ApiError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await?;
        debug!(raw = %response_text, "Raw model response");
        Ok(serde_json::from_str(&response_text)?)
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionsClient {
    async fn respond(&self, history: &[Message], tools: &[Value]) -> Result<ModelReply> {
        let request_body = RequestBody {
            model: &self.model,
            messages: history,
            stream: false,
            temperature: self.temperature,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        debug!(
            model = %self.model,
            messages = history.len(),
            tools = tools.len(),
            "Requesting completion"
        );

        let response_json = self.make_api_request(&request_body).await?;
        parse_reply(&response_json)
    }
}
