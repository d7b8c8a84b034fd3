//! Wire types for the authentication endpoints.
//!
//! Field names follow the consumed backend's token exchange format:
//! login and refresh both answer with `{ "access": ..., "refresh": ... }`,
//! refresh requests post `{ "refresh": ... }`.

use serde::{Deserialize, Serialize};

/// Body of a login call.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of a registration call.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a token refresh call.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest {
    pub refresh: String,
}

/// Successful token exchange result.
///
/// Login always returns both tokens; refresh may omit the refresh
/// token, in which case the held one stays valid.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_without_refresh() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"access":"T2"}"#).unwrap();
        assert_eq!(parsed.access, "T2");
        assert!(parsed.refresh.is_none());
    }

    #[test]
    fn test_token_response_with_refresh() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access":"T1","refresh":"R1"}"#).unwrap();
        assert_eq!(parsed.refresh.as_deref(), Some("R1"));
    }
}
