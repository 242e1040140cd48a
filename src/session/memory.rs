use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use super::storage::SessionStore;
use crate::error::{ChatbotError, Result};
use crate::models::Session;

/// Process-lifetime session map. Sessions are never evicted.
pub struct InMemorySessionStore {
    system_prompt: String,
    sessions: std::sync::Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl InMemorySessionStore {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            sessions: std::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn lock_map(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<Mutex<Session>>>>> {
        self.sessions
            .lock()
            .map_err(|e| ChatbotError::SessionError(format!("session map lock poisoned: {}", e)))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, key: &str) -> Result<Arc<Mutex<Session>>> {
        let mut sessions = self.lock_map()?;
        let session = sessions.entry(key.to_string()).or_insert_with(|| {
            debug!(session = key, "Created session");
            Arc::new(Mutex::new(Session::new(key, &self.system_prompt)))
        });
        Ok(Arc::clone(session))
    }

    fn get(&self, key: &str) -> Result<Option<Arc<Mutex<Session>>>> {
        Ok(self.lock_map()?.get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock_map()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
