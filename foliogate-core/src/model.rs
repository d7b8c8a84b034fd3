//! Domain model for the API session layer.
//!
//! This module defines:
//! - [`Secret`] - A wrapper for token values that prevents accidental logging
//! - [`Session`] - The access/refresh token pair held for an authenticated user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A secret value that prevents accidental exposure in logs.
///
/// The inner value is only accessible via [`expose()`](Secret::expose).
/// Debug and Display implementations show `[REDACTED]` instead of the value.
/// The backing memory is zeroed on drop.
#[derive(Clone, Serialize, Deserialize)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret value.
    ///
    /// Use sparingly and never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume the secret and return the inner value.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.0)
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Secret {}

/// The token pair held for an authenticated user.
///
/// A session exists only while an access token is held; "authenticated"
/// is a view on its presence, never independent state. Sessions are owned
/// by a [`CredentialStore`](crate::credentials::CredentialStore) and
/// mutated only through its set/clear operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The short-lived credential attached to outbound API calls.
    pub access_token: Secret,

    /// The longer-lived credential used solely to obtain a new access
    /// token. Absent if the backend issued none.
    pub refresh_token: Option<Secret>,

    /// When this session was last established or refreshed.
    pub refreshed_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with just an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Secret::new(access_token),
            refresh_token: None,
            refreshed_at: Utc::now(),
        }
    }

    /// Create a session with both access and refresh tokens.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(Secret::new(refresh_token));
        self
    }
}
