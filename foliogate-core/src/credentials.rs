//! The credential store: the single owner of the current session.
//!
//! [`CredentialStore`] keeps the live token pair in memory for lock-cheap
//! reads on every outbound request, and writes through to a
//! [`SessionStore`] backend so the session survives a restart. It is the
//! only shared mutable state in the session layer; the dispatcher and the
//! lifecycle facade hold it behind an `Arc` rather than reaching for any
//! ambient global.

use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::{Secret, Session};
use crate::store::{MemoryStore, SessionStore, StoreError};

/// Thread-safe owner of the current session.
///
/// Reads (`access_token`, `refresh_token`, `is_authenticated`) are pure
/// and infallible; mutations (`set_session`, `clear_session`) persist
/// write-through to the backend and bump a generation counter.
///
/// # Generation counter
///
/// Every mutation increments a monotone generation. A caller that
/// observed a 401 records the generation it sent with; if the generation
/// has moved by the time it holds the refresh gate, another caller
/// already refreshed (or tore down) the session and no second exchange
/// is issued.
pub struct CredentialStore {
    cache: RwLock<Option<Session>>,
    generation: AtomicU64,
    backend: Arc<dyn SessionStore>,
}

impl CredentialStore {
    /// Create a credential store over the given persistence backend.
    ///
    /// The cache starts empty; call [`restore`](Self::restore) to load a
    /// previously persisted session.
    pub fn new(backend: Arc<dyn SessionStore>) -> Self {
        Self {
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
            backend,
        }
    }

    /// Create a credential store with no persistence (memory backend).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Load the persisted session from the backend into the cache.
    ///
    /// Must run to completion before `is_authenticated` can be trusted
    /// at process start; the lifecycle facade gates this with its
    /// loading flag.
    pub async fn restore(&self) -> Result<(), StoreError> {
        let session = self.backend.load().await?;

        let restored = session.is_some();
        *self.cache.write() = session;
        self.generation.fetch_add(1, Ordering::SeqCst);

        if restored {
            tracing::debug!("restored persisted session");
        }
        Ok(())
    }

    /// Store a new token pair and mark the session authenticated.
    ///
    /// All subsequent outbound requests use the new access token.
    pub async fn set_session(
        &self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Result<(), StoreError> {
        let mut session = Session::new(access_token);
        if let Some(refresh) = refresh_token {
            session = session.with_refresh_token(refresh);
        }

        *self.cache.write() = Some(session.clone());
        self.generation.fetch_add(1, Ordering::SeqCst);

        self.backend.save(&session).await
    }

    /// Remove both tokens and mark the session unauthenticated.
    ///
    /// Idempotent.
    pub async fn clear_session(&self) -> Result<(), StoreError> {
        *self.cache.write() = None;
        self.generation.fetch_add(1, Ordering::SeqCst);

        self.backend.clear().await
    }

    /// The current access token, if the session is authenticated.
    pub fn access_token(&self) -> Option<Secret> {
        self.cache
            .read()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// The current refresh token, if one was issued.
    pub fn refresh_token(&self) -> Option<Secret> {
        self.cache
            .read()
            .as_ref()
            .and_then(|session| session.refresh_token.clone())
    }

    /// True iff an access token is present.
    ///
    /// A derived view of the session, never independent state.
    pub fn is_authenticated(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Current mutation generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("authenticated", &self.is_authenticated())
            .field("generation", &self.generation())
            .finish()
    }
}
