use std::sync::Arc;
use std::time::Instant;

use crate::orchestrator::ConversationOrchestrator;
use crate::session::SessionStore;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    pub sessions: Arc<dyn SessionStore>,
    pub catalog_size: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        sessions: Arc<dyn SessionStore>,
        catalog_size: usize,
    ) -> Self {
        Self {
            orchestrator,
            sessions,
            catalog_size,
            start_time: Instant::now(),
        }
    }
}
