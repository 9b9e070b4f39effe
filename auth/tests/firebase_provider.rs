//! Integration tests for the Firebase identity provider against a mock
//! Identity Toolkit server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use ecolesson_auth::{
    FirebaseConfig, FirebaseIdentityProvider, Identity, IdentityProvider, ProviderErrorKind,
};
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> FirebaseIdentityProvider {
    let config = FirebaseConfig::new("test-key").with_endpoint(format!("{}/v1", server.uri()));
    FirebaseIdentityProvider::new(config).unwrap()
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": { "code": 400, "message": message, "errors": [] } })
}

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({ "email": "ana@eco.com", "returnSecureToken": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-ana",
            "email": "ana@eco.com",
            "displayName": "Ana",
            "idToken": "token-ana",
            "registered": true
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sign_up_then_name_uses_returned_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-bia",
            "email": "bia@eco.com",
            "idToken": "token-bia"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(json!({ "idToken": "token-bia", "displayName": "Bia" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-bia",
            "email": "bia@eco.com",
            "displayName": "Bia"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let identity = provider.create_account("bia@eco.com", "segredo1").await.unwrap();
    provider.update_display_name(&identity, "Bia").await.unwrap();

    assert_eq!(identity.id.as_str(), "uid-bia");
    assert!(provider.current_identity().is_none(), "sign-up must not start a session");
}

#[tokio::test]
async fn test_rest_error_codes_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "WEAK_PASSWORD : Password should be at least 6 characters",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("INVALID_LOGIN_CREDENTIALS")))
        .mount(&server)
        .await;

    let provider = provider(&server);

    let weak = provider.create_account("bia@eco.com", "123").await.unwrap_err();
    assert_eq!(weak.kind, ProviderErrorKind::WeakCredential);

    let wrong = provider.authenticate("bia@eco.com", "errada").await.unwrap_err();
    assert_eq!(wrong.kind, ProviderErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn test_unparseable_error_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let error = provider(&server)
        .authenticate("ana@eco.com", "segredo1")
        .await
        .unwrap_err();

    assert_eq!(error.kind, ProviderErrorKind::Unknown);
}

#[tokio::test]
async fn test_sign_in_and_out_notify_listeners() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    let provider = provider(&server);
    let seen: Arc<Mutex<Vec<Option<Identity>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription =
        provider.subscribe(Box::new(move |change| sink.lock().unwrap().push(change.unwrap())));

    let identity = provider.authenticate("ana@eco.com", "segredo1").await.unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("Ana"));
    assert_eq!(provider.current_identity(), Some(identity.clone()));

    provider.terminate_session().await.unwrap();
    assert!(provider.current_identity().is_none());

    assert_eq!(*seen.lock().unwrap(), vec![None, Some(identity), None]);
}

#[tokio::test]
async fn test_rename_current_user_notifies() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(json!({ "idToken": "token-ana", "displayName": "Ana Clara" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-ana",
            "displayName": "Ana Clara"
        })))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let identity = provider.authenticate("ana@eco.com", "segredo1").await.unwrap();
    provider.update_display_name(&identity, "Ana Clara").await.unwrap();

    let current = provider.current_identity().unwrap();
    assert_eq!(current.display_name.as_deref(), Some("Ana Clara"));
}

#[tokio::test]
async fn test_update_without_token_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = provider(&server)
        .update_display_name(&Identity::new("stranger"), "X")
        .await
        .unwrap_err();

    assert_eq!(error.kind, ProviderErrorKind::Unknown);
}
