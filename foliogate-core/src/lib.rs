//! # Foliogate Core
//!
//! Session model and credential storage for the foliogate API session
//! layer.
//!
//! This crate provides:
//! - Domain types for the access/refresh token pair ([`Session`], [`Secret`])
//! - The [`SessionStore`] trait with memory, file, and (optionally)
//!   keyring-backed implementations
//! - [`CredentialStore`], the single owner of the live session shared by
//!   the request dispatcher and the lifecycle facade
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use foliogate_core::{CredentialStore, FileStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), foliogate_core::StoreError> {
//! let backend = Arc::new(FileStore::default_location()?);
//! let store = CredentialStore::new(backend);
//!
//! // Rehydrate a session persisted by a previous run
//! store.restore().await?;
//! if store.is_authenticated() {
//!     println!("welcome back");
//! }
//! # Ok(())
//! # }
//! ```

pub mod model;
pub mod store;
pub mod credentials;

// Re-export commonly used types at crate root
pub use model::{Secret, Session};

pub use store::{FileStore, MemoryStore, SessionStore, StoreError};

#[cfg(feature = "keyring-store")]
pub use store::KeyringStore;

pub use credentials::CredentialStore;
