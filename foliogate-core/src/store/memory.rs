//! In-memory session storage implementation.

use async_trait::async_trait;
use std::sync::RwLock;

use super::{SessionStore, StoreError};
use crate::model::Session;

/// In-memory session store for testing and ephemeral sessions.
///
/// This store is not persistent; the session is lost when the process
/// exits.
///
/// # Thread Safety
///
/// This implementation uses interior mutability via `RwLock` and is
/// safe to share across threads.
pub struct MemoryStore {
    session: RwLock<Option<Session>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
        }
    }

    /// Create a memory store holding an initial session.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let populated = self.session.read().map(|s| s.is_some()).unwrap_or(false);
        f.debug_struct("MemoryStore")
            .field("populated", &populated)
            .finish()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self) -> Result<Option<Session>, StoreError> {
        let session = self.session.read().map_err(|e| StoreError::BackendError {
            message: format!("lock poisoned: {}", e),
        })?;
        Ok(session.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let mut slot = self.session.write().map_err(|e| StoreError::BackendError {
            message: format!("lock poisoned: {}", e),
        })?;
        *slot = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.session.write().map_err(|e| StoreError::BackendError {
            message: format!("lock poisoned: {}", e),
        })?;
        *slot = None;
        Ok(())
    }
}
