//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p bazaar-cli -- migrate
//!
//! # Start the API
//! cargo run -p bazaar-api
//!
//! # Run integration tests
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! The server address comes from `BAZAAR_API_URL` (default
//! `http://localhost:3001`). Every test registers fresh users with unique
//! emails, so runs do not interfere with each other.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_API_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A fresh email address that no other test run uses.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// A fresh business identifier for products and categories.
#[must_use]
pub fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// HTTP client bound to the API under test.
pub struct ApiClient {
    pub client: Client,
    pub base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: base_url(),
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` if empty).
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be reached.
    pub async fn call(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.expect("Failed to reach the API");
        let status = response.status();
        let value = response.json().await.unwrap_or(Value::Null);
        (status, value)
    }

    /// Register a new user and log in, returning the bearer token.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails.
    pub async fn sign_up(&self, password: &str) -> (String, String) {
        let email = unique_email();
        let (status, body) = self
            .call(
                reqwest::Method::POST,
                "/users/register",
                None,
                Some(json!({ "name": "Integration", "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        let (status, body) = self
            .call(
                reqwest::Method::POST,
                "/users/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");

        let token = body["token"]
            .as_str()
            .expect("login response has a token")
            .to_owned();
        (email, token)
    }
}
