//! Error taxonomy for the session layer.

use thiserror::Error;

use foliogate_core::StoreError;

/// Error type for API session operations.
///
/// Callers route on the variant: [`SessionExpired`](ApiError::SessionExpired)
/// is the signal to send the user back to the login entry point; everything
/// else is an ordinary request failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, timeout). Propagated untouched; no recovery is
    /// attempted for these.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The session could not be recovered: the refresh token was missing,
    /// rejected, or the refresh exchange itself failed. The credential
    /// store has been cleared; the user must authenticate again.
    #[error("session expired, re-authentication required")]
    SessionExpired,

    /// Credential persistence failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A typed helper received a status it could not use.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A request body failed to serialize or a response body failed to
    /// decode.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The client configuration is invalid (bad base URL or request path).
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ApiError {
    /// True iff this error means the user must log in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}
