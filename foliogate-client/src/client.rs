//! The request dispatcher.
//!
//! [`ApiClient`] wraps the HTTP transport: it attaches the current
//! access token as a bearer credential on every outbound request and
//! routes first-occurrence 401 responses into the session recovery
//! protocol (see the `recovery` module). Every other response passes
//! through verbatim.

use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use foliogate_core::CredentialStore;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::request::ApiRequest;

/// Authenticated API client.
///
/// The credential store is passed in explicitly and shared behind an
/// `Arc`; the client never touches ambient global state.
///
/// # Example
///
/// ```rust,no_run
/// use foliogate_client::{ApiClient, ApiConfig, ApiRequest};
/// use foliogate_core::CredentialStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), foliogate_client::ApiError> {
/// let store = Arc::new(CredentialStore::in_memory());
/// let config = ApiConfig::parse("http://localhost:8000")?;
/// let client = ApiClient::new(config, store)?;
///
/// let response = client.send(ApiRequest::get("/api/portfolio/")).await?;
/// println!("status: {}", response.status());
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ApiConfig,
    pub(crate) store: Arc<CredentialStore>,

    /// Single-flight gate for the refresh exchange. Held only while a
    /// refresh is in flight, never across the original send or the
    /// replay.
    pub(crate) refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a client over the given configuration and credential store.
    pub fn new(config: ApiConfig, store: Arc<CredentialStore>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            store,
            refresh_gate: Mutex::new(()),
        })
    }

    /// The credential store this client reads tokens from.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// The client configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Dispatch a request.
    ///
    /// - Transport errors (no HTTP status) propagate unchanged.
    /// - A 401 on a request that has not been replayed yet hands off to
    ///   session recovery; on successful recovery the caller sees the
    ///   replay's response and never the 401.
    /// - A 401 on an already-replayed request, and every other status,
    ///   is returned verbatim.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let generation = self.store.generation();
        let response = self.transmit(&request).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !request.retried() {
            debug!(path = %request.path, "request rejected with 401, entering session recovery");
            return self.recover(request, generation).await;
        }

        Ok(response)
    }

    /// Build and transmit the wire request, attaching the current access
    /// token if one is present.
    pub(crate) async fn transmit(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let url = self.config.endpoint(&request.path)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(request.headers.clone());

        // The token is read at send time, so a replay always carries the
        // freshest credential, never the one that produced the 401.
        if let Some(token) = self.store.access_token() {
            builder = builder.bearer_auth(token.expose());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(ApiRequest::get(path)).await?;
        Self::decode(response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::post(path).with_json(body)?;
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::put(path).with_json(body)?;
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// DELETE a resource, expecting a success status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(ApiRequest::delete(path)).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::UnexpectedStatus { status, body });
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("store", &self.store)
            .finish()
    }
}
