//! Integration tests for order placement against a live server.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The API server running (cargo run -p bazaar-api)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use bazaar_integration_tests::{ApiClient, unique_id};
use reqwest::{Method, StatusCode};
use serde_json::json;

/// Create a category and one product in it, returning the product id.
async fn create_product(api: &ApiClient, token: &str, price: &str) -> i64 {
    let category = unique_id("cat");
    let (status, _) = api
        .call(
            Method::POST,
            "/categories/create",
            Some(token),
            Some(json!({ "categoryName": category })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = api
        .call(
            Method::POST,
            "/products/create",
            Some(token),
            Some(json!({
                "productId": unique_id("sku"),
                "title": "Integration product",
                "price": price,
                "categoryName": category,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_order_total_is_computed_server_side() {
    let api = ApiClient::new();
    let (_, token) = api.sign_up("integration-pass").await;
    let p1 = create_product(&api, &token, "10.00").await;
    let p2 = create_product(&api, &token, "5.00").await;

    let (status, body) = api
        .call(
            Method::POST,
            "/orders/order_place",
            Some(&token),
            Some(json!({
                "products": [
                    { "productId": p1, "quantity": 2, "price": "0.01" },
                    { "productId": p2, "quantity": 1 },
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["totalPrice"], "25.00");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_unknown_product_is_rejected() {
    let api = ApiClient::new();
    let (_, token) = api.sign_up("integration-pass").await;
    let p1 = create_product(&api, &token, "1.00").await;

    let (status, _) = api
        .call(
            Method::POST,
            "/orders/order_place",
            Some(&token),
            Some(json!({
                "products": [
                    { "productId": p1, "quantity": 1 },
                    { "productId": i32::MAX, "quantity": 1 },
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = api
        .call(Method::GET, "/orders/order_history", Some(&token), None)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_orders_are_private() {
    let api = ApiClient::new();
    let (_, owner) = api.sign_up("integration-pass").await;
    let (_, other) = api.sign_up("integration-pass").await;
    let p1 = create_product(&api, &owner, "2.50").await;

    let (_, body) = api
        .call(
            Method::POST,
            "/orders/order_place",
            Some(&owner),
            Some(json!({ "products": [{ "productId": p1, "quantity": 1 }] })),
        )
        .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = api
        .call(
            Method::GET,
            &format!("/orders/{order_id}"),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
