use std::collections::HashSet;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::message::{Message, Role};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Local>,
    pub last_updated: DateTime<Local>,
    pub messages: Vec<Message>,
}

impl Session {
    /// Create a session seeded with the system instructions.
    pub fn new(session_id: impl Into<String>, system_prompt: &str) -> Self {
        let now = Local::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_updated: now,
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Number of completed user turns.
    pub fn turn_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }
}

/// Check that every tool result answers exactly one earlier, still-open
/// tool call, and that every tool result sits between the assistant message
/// that requested it and a later assistant message.
pub fn verify_tool_correlation(messages: &[Message]) -> Result<(), String> {
    let mut open: HashSet<&str> = HashSet::new();
    let mut previous_role: Option<Role> = None;

    for (index, message) in messages.iter().enumerate() {
        match message.role {
            Role::Assistant => {
                if !open.is_empty() {
                    return Err(format!(
                        "message {}: assistant replied while {} tool calls are unanswered",
                        index,
                        open.len()
                    ));
                }
                for call in message.tool_calls.iter().flatten() {
                    if !open.insert(call.id.as_str()) {
                        return Err(format!(
                            "message {}: duplicate tool call id '{}'",
                            index, call.id
                        ));
                    }
                }
            }
            Role::Tool => {
                if !matches!(previous_role, Some(Role::Assistant) | Some(Role::Tool)) {
                    return Err(format!(
                        "message {}: tool result not preceded by an assistant request",
                        index
                    ));
                }
                let id = message
                    .tool_call_id
                    .as_deref()
                    .ok_or_else(|| format!("message {}: tool result without an id", index))?;
                if !open.remove(id) {
                    return Err(format!(
                        "message {}: tool result '{}' matches no open request",
                        index, id
                    ));
                }
            }
            Role::User | Role::System => {
                if !open.is_empty() {
                    return Err(format!(
                        "message {}: turn moved on with {} unanswered tool calls",
                        index,
                        open.len()
                    ));
                }
            }
        }
        previous_role = Some(message.role);
    }

    if open.is_empty() {
        Ok(())
    } else {
        Err(format!("{} tool calls were never answered", open.len()))
    }
}
