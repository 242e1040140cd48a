//! Per-turn conversation loop.
//!
//! A turn moves through `AwaitingModel -> (ExecutingTools -> AwaitingModel)*
//! -> Done`. All messages produced during a turn are staged on a copy of the
//! history and committed to the session only once the turn reaches `Done`,
//! so a failed turn leaves the session exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ChatbotError, Result};
use crate::llm::{LanguageModel, ModelReply};
use crate::models::{Message, Session, ToolCall};
use crate::session::SessionStore;
use crate::tools::{format_tools_for_llm, ToolRegistry};

/// Upper bound on model -> tool -> model round trips within one turn.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// One executed tool call, reported back to the shells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInvocation {
    pub id: String,
    pub tool: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub answer: String,
    pub invocations: Vec<ToolInvocation>,
}

enum TurnState {
    AwaitingModel,
    ExecutingTools(Vec<ToolCall>),
    Done(String),
}

pub struct ConversationOrchestrator {
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    tool_definitions: Vec<Value>,
    max_tool_rounds: usize,
}

impl ConversationOrchestrator {
    pub fn new(model: Arc<dyn LanguageModel>, tools: ToolRegistry) -> Self {
        let tool_definitions = format_tools_for_llm(&tools);
        Self {
            model,
            tools,
            tool_definitions,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    /// Run one user turn against the session stored under `key`. The
    /// session lock is held for the whole turn.
    pub async fn chat(
        &self,
        sessions: &dyn SessionStore,
        key: &str,
        user_text: &str,
    ) -> Result<TurnOutcome> {
        let session = sessions.get_or_create(key)?;
        let mut session = session.lock().await;
        self.run_turn(&mut session, user_text).await
    }

    pub async fn run_turn(&self, session: &mut Session, user_text: &str) -> Result<TurnOutcome> {
        let mut pending = session.messages.clone();
        pending.push(Message::user(user_text));

        let mut invocations = Vec::new();
        let mut rounds = 0;
        let mut state = TurnState::AwaitingModel;

        loop {
            state = match state {
                TurnState::AwaitingModel => {
                    match self.model.respond(&pending, &self.tool_definitions).await? {
                        ModelReply::Answer(answer) => TurnState::Done(answer),
                        ModelReply::ToolCalls { content, calls } => {
                            rounds += 1;
                            if rounds > self.max_tool_rounds {
                                warn!(
                                    session = %session.session_id,
                                    limit = self.max_tool_rounds,
                                    "Tool round limit reached; abandoning turn"
                                );
                                return Err(ChatbotError::ToolRoundLimit(self.max_tool_rounds));
                            }
                            let calls = assign_call_ids(calls)?;
                            debug!(round = rounds, calls = calls.len(), "Model requested tools");
                            pending.push(Message::assistant_tool_calls(content, calls.clone()));
                            TurnState::ExecutingTools(calls)
                        }
                    }
                }
                TurnState::ExecutingTools(calls) => {
                    for call in calls {
                        let invocation = self.dispatch(&call).await?;
                        pending.push(Message::tool_result(
                            invocation.id.clone(),
                            invocation.output.clone(),
                        ));
                        invocations.push(invocation);
                    }
                    TurnState::AwaitingModel
                }
                TurnState::Done(answer) => {
                    pending.push(Message::assistant(answer.clone()));
                    session.messages = pending;
                    session.last_updated = Local::now();
                    return Ok(TurnOutcome {
                        answer,
                        invocations,
                    });
                }
            };
        }
    }

    /// Execute one tool call. Unknown tools abort the turn; bad arguments
    /// are reported back to the model as the tool result.
    async fn dispatch(&self, call: &ToolCall) -> Result<ToolInvocation> {
        let name = call.function.name.as_str();
        if self.tools.get(name).is_none() {
            warn!(tool = name, "Model requested an unknown tool");
            return Err(ChatbotError::UnknownTool(name.to_string()));
        }

        let (input, output) = match self.tools.parse_query(name, &call.function.arguments) {
            Ok(query) => {
                debug!(tool = name, query = %query, "Dispatching tool");
                let output = self.tools.call(name, &query).await?;
                (query, output)
            }
            Err(message) => {
                warn!(tool = name, error = %message, "Rejected tool arguments");
                (
                    call.function.arguments.clone(),
                    format!("Error: {}", message),
                )
            }
        };

        Ok(ToolInvocation {
            id: call.id.clone(),
            tool: name.to_string(),
            input,
            output,
        })
    }
}

/// Give id-less calls a fresh id and reject duplicate ids within a batch.
fn assign_call_ids(calls: Vec<ToolCall>) -> Result<Vec<ToolCall>> {
    let mut seen = HashSet::new();
    calls
        .into_iter()
        .map(|mut call| {
            if call.id.trim().is_empty() {
                call.id = format!("call_{}", Uuid::new_v4().simple());
            }
            if !seen.insert(call.id.clone()) {
                return Err(ChatbotError::CapabilityError(format!(
                    "model issued duplicate tool call id '{}'",
                    call.id
                )));
            }
            Ok(call)
        })
        .collect()
}
