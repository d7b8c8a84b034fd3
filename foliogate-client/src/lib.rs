//! # Foliogate Client
//!
//! Authenticated API session layer for the foliogate backend.
//!
//! This crate provides:
//! - [`ApiClient`] - a request dispatcher that attaches the current
//!   access token to every outbound call
//! - Transparent session recovery: a first 401 triggers a single
//!   refresh-and-replay cycle before the failure surfaces
//! - [`AuthSession`] - the login/register/logout facade with the
//!   authenticated/loading flags the UI layer gates on
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use foliogate_client::{ApiClient, ApiConfig, AuthSession};
//! use foliogate_core::{CredentialStore, FileStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), foliogate_client::ApiError> {
//!     let backend = Arc::new(FileStore::default_location()?);
//!     let store = Arc::new(CredentialStore::new(backend));
//!     let client = Arc::new(ApiClient::new(
//!         ApiConfig::parse("http://localhost:8000")?,
//!         store,
//!     )?);
//!
//!     let auth = AuthSession::new(client.clone());
//!     auth.restore().await?;
//!
//!     if !auth.is_authenticated() {
//!         auth.login("alice", "correct-horse").await?;
//!     }
//!
//!     let portfolio: serde_json::Value = client.get_json("/api/portfolio/").await?;
//!     println!("{portfolio}");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod request;

mod recovery;
mod wire;

// Re-export commonly used types at crate root
pub use auth::AuthSession;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use request::ApiRequest;
