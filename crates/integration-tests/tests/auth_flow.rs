//! Integration tests for registration, login and token revocation.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The API server running (cargo run -p bazaar-api)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bazaar_integration_tests::ApiClient;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health_endpoints() {
    let api = ApiClient::new();

    let (status, _) = api.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = api.call(Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_token_resolves_to_registered_user() {
    let api = ApiClient::new();
    let (email, token) = api.sign_up("integration-pass").await;

    let (status, body) = api
        .call(Method::GET, "/users/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], email.as_str());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_wrong_password_is_unauthorized() {
    let api = ApiClient::new();
    let (email, _) = api.sign_up("integration-pass").await;

    let (status, body) = api
        .call(
            Method::POST,
            "/users/login",
            None,
            Some(json!({ "email": email, "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_logout_revokes_token() {
    let api = ApiClient::new();
    let (_, token) = api.sign_up("integration-pass").await;

    let (status, _) = api
        .call(Method::POST, "/users/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = api
        .call(Method::GET, "/users/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
