use serde_json::Value;

use super::ModelReply;
use crate::error::{ChatbotError, Result};
use crate::models::ToolCall;

fn first_message(response_json: &Value) -> Result<&Value> {
    let choices = response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ChatbotError::CapabilityError("No choices in response".to_string()))?;

    let first_choice = choices
        .first()
        .ok_or_else(|| ChatbotError::CapabilityError("Empty choices array".to_string()))?;

    first_choice
        .get("message")
        .ok_or_else(|| ChatbotError::CapabilityError("No message in response".to_string()))
}

/// Extract typed tool calls from a non-streaming response, if present.
pub fn parse_tool_calls(response_json: &Value) -> Result<Option<Vec<ToolCall>>> {
    let message = first_message(response_json)?;

    match message.get("tool_calls").and_then(|tc| tc.as_array()) {
        Some(tool_calls) if !tool_calls.is_empty() => {
            let typed = tool_calls
                .iter()
                .map(|tc| serde_json::from_value::<ToolCall>(tc.clone()))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| {
                    ChatbotError::CapabilityError(format!("Malformed tool call in response: {}", e))
                })?;
            Ok(Some(typed))
        }
        _ => Ok(None),
    }
}

/// Extract the assistant text from a non-streaming response.
pub fn extract_content(response_json: &Value) -> Result<Option<String>> {
    let message = first_message(response_json)?;
    Ok(message
        .get("content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string()))
}

/// Interpret a chat-completions response as either a final answer or a
/// tool-call request. Tool calls take precedence over content.
pub fn parse_reply(response_json: &Value) -> Result<ModelReply> {
    let content = extract_content(response_json)?.filter(|c| !c.trim().is_empty());

    if let Some(calls) = parse_tool_calls(response_json)? {
        return Ok(ModelReply::ToolCalls { content, calls });
    }

    content.map(ModelReply::Answer).ok_or_else(|| {
        ChatbotError::CapabilityError("Model returned neither content nor tool calls".to_string())
    })
}
