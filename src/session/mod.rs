mod memory;
mod storage;

pub use memory::InMemorySessionStore;
pub use storage::SessionStore;

use uuid::Uuid;

/// Fresh opaque session key.
pub fn new_session_key() -> String {
    Uuid::new_v4().to_string()
}
