//! Language-model capability: conversation history in, either a final
//! answer or a set of tool-call requests out.

pub mod client;
pub mod models;
pub mod response;

pub use client::ChatCompletionsClient;
pub use response::{extract_content, parse_reply, parse_tool_calls};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{Message, ToolCall};

#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    Answer(String),
    ToolCalls {
        /// Optional text the model sent alongside its tool calls.
        content: Option<String>,
        calls: Vec<ToolCall>,
    },
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// `tools` holds definitions in the chat-completions `tools` format.
    async fn respond(&self, history: &[Message], tools: &[Value]) -> Result<ModelReply>;
}
