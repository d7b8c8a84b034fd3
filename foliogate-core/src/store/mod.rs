//! Session persistence abstraction.
//!
//! This module provides:
//! - [`SessionStore`] - Trait for session persistence backends
//! - [`MemoryStore`] - In-memory implementation for testing and ephemeral use
//! - [`FileStore`] - JSON file in the platform configuration directory
//! - [`KeyringStore`] - OS keyring implementation (with `keyring-store` feature)
//!
//! A backend stores at most one session: the token pair that must survive
//! a process restart. Everything else the session layer tracks is derived.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Session;

mod memory;
mod file;
#[cfg(feature = "keyring-store")]
mod keyring;

pub use memory::MemoryStore;
pub use file::FileStore;
#[cfg(feature = "keyring-store")]
pub use keyring::KeyringStore;

/// Error type for session store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend encountered an error.
    #[error("backend error: {message}")]
    BackendError { message: String },

    /// I/O error reading or writing persisted state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration directory not available.
    #[error("configuration directory not available")]
    ConfigDirUnavailable,

    /// The keyring backend is not available.
    #[error("keyring not available: {message}")]
    KeyringUnavailable { message: String },
}

/// Abstraction over session persistence backends.
///
/// Implementations include:
/// - [`MemoryStore`] - In-memory storage for testing and ephemeral sessions
/// - [`FileStore`] - JSON file under the platform config directory
/// - `KeyringStore` (with `keyring-store` feature) - OS keyring
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any.
    ///
    /// Returns `Ok(None)` if no session has been saved or it was cleared.
    async fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Persist a session, overwriting any existing one.
    async fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove the persisted session.
    ///
    /// Returns `Ok(())` even if nothing was stored.
    async fn clear(&self) -> Result<(), StoreError>;
}
