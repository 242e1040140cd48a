use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::Session;

/// Keyed conversation storage. Each session sits behind its own mutex so a
/// turn can hold it across model and tool calls without blocking other
/// sessions.
pub trait SessionStore: Send + Sync {
    /// Return the session for `key`, creating it on first use.
    fn get_or_create(&self, key: &str) -> Result<Arc<Mutex<Session>>>;

    fn get(&self, key: &str) -> Result<Option<Arc<Mutex<Session>>>>;

    fn keys(&self) -> Result<Vec<String>>;
}
