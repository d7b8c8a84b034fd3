//! Outbound request representation.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::ApiError;

/// An outbound API request.
///
/// Carries everything the dispatcher needs to (re)build the wire
/// request, plus the one-shot `retried` marker that caps session
/// recovery at a single replay per logical request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,

    /// Request path, resolved against the configured base URL.
    pub path: String,

    /// Extra headers. The authorization header is never set here; the
    /// dispatcher attaches the current bearer token at send time.
    pub headers: HeaderMap,

    /// Optional JSON body.
    pub body: Option<serde_json::Value>,

    /// True once this request has been replayed after a refresh.
    /// Never set twice for the same logical request.
    retried: bool,
}

impl ApiRequest {
    /// Create a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Create a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Whether this request has already been replayed once.
    pub fn retried(&self) -> bool {
        self.retried
    }

    /// Mark this request as replayed. Called exactly once, immediately
    /// before the recovery replay.
    pub(crate) fn mark_retried(&mut self) {
        debug_assert!(!self.retried, "a request is never replayed twice");
        self.retried = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_marker_defaults_false() {
        let request = ApiRequest::get("/api/assets/");
        assert!(!request.retried());
    }

    #[test]
    fn test_mark_retried() {
        let mut request = ApiRequest::get("/api/assets/");
        request.mark_retried();
        assert!(request.retried());
    }

    #[test]
    fn test_with_json_body() {
        let request = ApiRequest::post("/api/assets/")
            .with_json(&serde_json::json!({"ticker": "VTI"}))
            .unwrap();
        assert_eq!(request.body.unwrap()["ticker"], "VTI");
    }
}
