//! The session recovery protocol.
//!
//! A request that draws a 401 before ever being replayed enters this
//! state machine: `IDLE -> REFRESHING -> { REPLAYING, FAILED }`.
//!
//! REFRESHING exchanges the held refresh token for a new access token,
//! serialized behind the client's refresh gate so that N concurrently
//! failing requests produce exactly one exchange. REPLAYING re-dispatches
//! the original request once with the new token; its outcome, including
//! a second 401, is final. FAILED tears the session down and surfaces
//! [`ApiError::SessionExpired`] — the caller's cue to route the user
//! back to the login entry point; this layer never navigates.

use reqwest::Response;
use tracing::{debug, error, info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::wire::{RefreshRequest, TokenResponse};

impl ApiClient {
    /// Recover from a first-occurrence 401: refresh once, replay once.
    ///
    /// `observed_generation` is the credential store generation at the
    /// time the failing request was sent. If the generation has moved by
    /// the time the gate is held, a concurrent request already resolved
    /// the refresh and this caller reuses its outcome.
    pub(crate) async fn recover(
        &self,
        mut request: ApiRequest,
        observed_generation: u64,
    ) -> Result<Response, ApiError> {
        {
            let _gate = self.refresh_gate.lock().await;

            if self.store.generation() == observed_generation {
                self.refresh_session().await?;
            } else if self.store.is_authenticated() {
                debug!("session already refreshed by a concurrent request");
            } else {
                // The winning refresh failed and tore the session down;
                // all waiters fail together without a second exchange.
                return Err(ApiError::SessionExpired);
            }
        }

        request.mark_retried();
        debug!(path = %request.path, "replaying request with refreshed token");

        // The replay's result is final: a repeat 401 passes through
        // verbatim because the retry marker is now set.
        self.transmit(&request).await
    }

    /// Exchange the refresh token for a new access token and update the
    /// credential store. Any failure clears the store and surfaces the
    /// session-expired signal.
    async fn refresh_session(&self) -> Result<(), ApiError> {
        let Some(refresh_token) = self.store.refresh_token() else {
            warn!("401 received with no refresh token held, tearing down session");
            return self.teardown().await;
        };

        info!("access token rejected, attempting refresh");

        let url = self.config.endpoint(&self.config.refresh_path)?;
        let exchange = self
            .http
            .post(url)
            .json(&RefreshRequest {
                refresh: refresh_token.expose().to_string(),
            })
            .send()
            .await;

        let response = match exchange {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "token refresh exchange failed");
                return self.teardown().await;
            }
        };

        if !response.status().is_success() {
            error!(status = %response.status(), "token refresh rejected");
            return self.teardown().await;
        }

        let tokens: TokenResponse = match response.json().await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(error = %e, "token refresh returned an unreadable body");
                return self.teardown().await;
            }
        };

        // Keep the old refresh token when the exchange did not rotate it.
        let new_refresh = tokens.refresh.or_else(|| Some(refresh_token.into_inner()));
        self.store.set_session(tokens.access, new_refresh).await?;

        info!("access token refreshed");
        Ok(())
    }

    /// Clear the credential store and surface the session-expired signal.
    async fn teardown(&self) -> Result<(), ApiError> {
        if let Err(e) = self.store.clear_session().await {
            error!(error = %e, "failed to clear credential store during session teardown");
        }
        Err(ApiError::SessionExpired)
    }
}
