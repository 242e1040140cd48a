//! Route handlers. Each one extracts its input, calls into the
//! orchestrator or session store, and returns JSON.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::evaluation::{default_test_cases, evaluate, EvaluationReport, TestCase};
use crate::models::Message;
use crate::orchestrator::ToolInvocation;
use crate::prompt::system_prompt;
use crate::session::{new_session_key, InMemorySessionStore};

use super::error::ApiError;
use super::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub products: usize,
    pub sessions: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    pub tools_used: Vec<ToolInvocation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub created_at: DateTime<Local>,
    pub last_updated: DateTime<Local>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let sessions = state.sessions.keys()?.len();
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        products: state.catalog_size,
        sessions,
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let session_id = match request.session_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => new_session_key(),
    };

    let outcome = state
        .orchestrator
        .chat(state.sessions.as_ref(), &session_id, &request.message)
        .await?;

    Ok(Json(ChatResponse {
        session_id,
        answer: outcome.answer,
        tools_used: outcome.invocations,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sessions
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("session '{}' not found", id)))?;
    let session = session.lock().await;

    Ok(Json(SessionResponse {
        session_id: session.session_id.clone(),
        created_at: session.created_at,
        last_updated: session.last_updated,
        messages: session.messages.clone(),
    }))
}

pub async fn evaluate_default(
    State(state): State<AppState>,
) -> Result<Json<EvaluationReport>, ApiError> {
    Ok(Json(run_evaluation(&state, default_test_cases()).await))
}

pub async fn evaluate_cases(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationReport>, ApiError> {
    let cases = request.test_cases.unwrap_or_else(default_test_cases);
    Ok(Json(run_evaluation(&state, cases).await))
}

/// Evaluation runs in a throwaway store so it never touches chat sessions.
async fn run_evaluation(state: &AppState, cases: Vec<TestCase>) -> EvaluationReport {
    let store = InMemorySessionStore::new(system_prompt());
    let key = format!("eval-{}", new_session_key());
    info!(session = %key, cases = cases.len(), "Starting evaluation run");
    evaluate(&state.orchestrator, &store, &key, &cases).await
}
