//! Integration tests for the session lifecycle facade.

use std::sync::Arc;

use foliogate_client::{ApiClient, ApiConfig, ApiError, ApiRequest, AuthSession};
use foliogate_core::{CredentialStore, MemoryStore, Session, SessionStore};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a facade backed by an in-memory credential store.
fn setup(server: &MockServer) -> (AuthSession, Arc<ApiClient>, Arc<CredentialStore>) {
    let store = Arc::new(CredentialStore::in_memory());
    let config = ApiConfig::parse(&server.uri()).unwrap();
    let client = Arc::new(ApiClient::new(config, store.clone()).unwrap());
    (AuthSession::new(client.clone()), client, store)
}

#[tokio::test]
async fn test_login_populates_credential_store() {
    let server = MockServer::start().await;
    let (auth, client, store) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(serde_json::json!({
            "username": "alice",
            "password": "pw1"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access": "T1", "refresh": "R1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/portfolio/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    auth.login("alice", "pw1").await.unwrap();

    assert!(auth.is_authenticated());
    assert_eq!(store.access_token().unwrap().expose(), "T1");
    assert_eq!(store.refresh_token().unwrap().expose(), "R1");

    // Subsequent requests carry the new token
    let response = client.send(ApiRequest::get("/api/portfolio/")).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_login_failure_reports_err_without_authenticating() {
    let server = MockServer::start().await;
    let (auth, _client, store) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "No active account found with the given credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = auth.login("alice", "wrong").await;

    assert!(matches!(
        result,
        Err(ApiError::UnexpectedStatus { status, .. }) if status == 401
    ));
    assert!(!auth.is_authenticated());
    assert!(store.access_token().is_none());
}

#[tokio::test]
async fn test_register_does_not_authenticate() {
    let server = MockServer::start().await;
    let (auth, _client, _store) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .and(body_json(serde_json::json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "pw2"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    auth.register("bob", "bob@example.com", "pw2").await.unwrap();

    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_register_failure_reports_err() {
    let server = MockServer::start().await;
    let (auth, _client, _store) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "username": ["A user with that username already exists."]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = auth.register("bob", "bob@example.com", "pw2").await;

    assert!(matches!(
        result,
        Err(ApiError::UnexpectedStatus { status, .. }) if status == 400
    ));
}

#[tokio::test]
async fn test_logout_clears_session_without_network() {
    // No mocks mounted: logout must not issue any request
    let server = MockServer::start().await;
    let (auth, _client, store) = setup(&server);
    store
        .set_session("T1", Some("R1".to_string()))
        .await
        .unwrap();

    auth.logout().await.unwrap();

    assert!(!auth.is_authenticated());
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test]
async fn test_loading_flag_gates_restoration() {
    let server = MockServer::start().await;
    let (auth, _client, _store) = setup(&server);

    assert!(auth.is_loading());

    auth.restore().await.unwrap();

    assert!(!auth.is_loading());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_restore_rehydrates_persisted_session() {
    let server = MockServer::start().await;

    // A previous run left a session behind
    let backend = Arc::new(MemoryStore::new());
    backend
        .save(&Session::new("T1").with_refresh_token("R1"))
        .await
        .unwrap();

    let store = Arc::new(CredentialStore::new(backend));
    let config = ApiConfig::parse(&server.uri()).unwrap();
    let client = Arc::new(ApiClient::new(config, store.clone()).unwrap());
    let auth = AuthSession::new(client);

    assert!(auth.is_loading());
    assert!(!auth.is_authenticated());

    auth.restore().await.unwrap();

    assert!(!auth.is_loading());
    assert!(auth.is_authenticated());
    assert_eq!(store.access_token().unwrap().expose(), "T1");
}

#[tokio::test]
async fn test_login_then_expiry_then_recovery_end_to_end() {
    let server = MockServer::start().await;
    let (auth, client, store) = setup(&server);

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access": "T1", "refresh": "R1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // T1 has expired by the time the portfolio is fetched
    Mock::given(method("GET"))
        .and(path("/api/portfolio/"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(serde_json::json!({"refresh": "R1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access": "T2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/portfolio/"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"positions": [], "total_value": 0.0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    auth.login("alice", "pw1").await.unwrap();
    let portfolio: serde_json::Value = client.get_json("/api/portfolio/").await.unwrap();

    // The expiry and recovery were invisible to the caller
    assert_eq!(portfolio["total_value"], 0.0);
    assert_eq!(store.access_token().unwrap().expose(), "T2");
    assert!(auth.is_authenticated());
}
