//! In-memory session store: one `ConversationState` per session key.
//!
//! Nothing is persisted. Web sessions are dropped when their connection
//! closes; terminal sessions live as long as the process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::state::ConversationState;

/// Shared handle to a single session's state.
pub type SessionHandle = Arc<Mutex<ConversationState>>;

/// Maps session keys to conversation state.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the state for `key`, creating an empty one on first use.
    pub async fn get_or_create(&self, key: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(key) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        let handle = sessions.entry(key.to_string()).or_insert_with(|| {
            tracing::debug!(session = key, "Created conversation session");
            Arc::new(Mutex::new(ConversationState::new()))
        });
        Arc::clone(handle)
    }

    /// Fetch an existing session without creating one.
    pub async fn get(&self, key: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Forget a session. Returns whether it existed.
    pub async fn remove(&self, key: &str) -> bool {
        let removed = self.sessions.write().await.remove(key).is_some();
        if removed {
            tracing::debug!(session = key, "Dropped conversation session");
        }
        removed
    }

    /// Clone the current state of a session.
    pub async fn snapshot(&self, key: &str) -> Option<ConversationState> {
        let handle = self.get(key).await?;
        let state = handle.lock().await;
        Some(state.clone())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
