//! The session lifecycle facade.
//!
//! [`AuthSession`] is the surface the UI layer talks to: login,
//! registration, logout, startup restoration, and the two read-only
//! flags that gate rendering. Login and registration failures come back
//! as `Err` values, never as panics; they are expected, user-correctable
//! conditions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::wire::{LoginRequest, RegisterRequest, TokenResponse};

/// Login, registration, and logout over a shared [`ApiClient`].
///
/// The authentication calls go directly to the transport rather than
/// through the dispatcher: a token exchange must never trigger the 401
/// recovery path itself.
pub struct AuthSession {
    client: Arc<ApiClient>,

    /// True only during initial session restoration at process start.
    restoring: AtomicBool,
}

impl AuthSession {
    /// Create a facade over the given client.
    ///
    /// The session starts in the loading state; call
    /// [`restore`](Self::restore) to rehydrate persisted credentials and
    /// clear it.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            restoring: AtomicBool::new(true),
        }
    }

    /// Rehydrate the credential store from its persistence backend.
    ///
    /// Runs to completion before `is_authenticated` is meaningful;
    /// `is_loading` reports true until then, whether restoration
    /// succeeded or not.
    pub async fn restore(&self) -> Result<(), ApiError> {
        let result = self.client.store.restore().await;
        self.restoring.store(false, Ordering::SeqCst);
        result?;
        Ok(())
    }

    /// Exchange credentials for a token pair and populate the
    /// credential store.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = self.client.config.endpoint(&self.client.config.token_path)?;
        let response = self
            .client
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "login rejected");
            return Err(ApiError::UnexpectedStatus { status, body });
        }

        let body = response.text().await?;
        let tokens: TokenResponse = serde_json::from_str(&body)?;
        self.client
            .store
            .set_session(tokens.access, tokens.refresh)
            .await?;

        info!(username, "login succeeded");
        Ok(())
    }

    /// Create a new account.
    ///
    /// Registration does not authenticate the new account; the caller
    /// follows up with [`login`](Self::login).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let url = self
            .client
            .config
            .endpoint(&self.client.config.register_path)?;
        let response = self
            .client
            .http
            .post(url)
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "registration rejected");
            return Err(ApiError::UnexpectedStatus { status, body });
        }

        info!(username, "registration succeeded");
        Ok(())
    }

    /// Clear the credential store. Local state teardown only; no
    /// network traffic.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.store.clear_session().await?;
        info!("logged out");
        Ok(())
    }

    /// True iff an access token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.client.store.is_authenticated()
    }

    /// True only while the initial restoration has not completed.
    pub fn is_loading(&self) -> bool {
        self.restoring.load(Ordering::SeqCst)
    }

    /// The client this facade authenticates.
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .field("loading", &self.is_loading())
            .finish()
    }
}
