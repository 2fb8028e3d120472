//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                               - Welcome message
//! GET    /health                         - Liveness check
//! GET    /health/ready                   - Readiness check (storage ping)
//!
//! # Users
//! POST   /users/register                 - Create an account (rate limited)
//! POST   /users/login                    - Exchange credentials for a token (rate limited)
//! POST   /users/logout                   - Revoke the presented token (auth)
//! GET    /users/profile                  - Current user (auth)
//! GET    /users                          - All users (auth)
//!
//! # Orders (auth)
//! POST   /orders/order_place             - Place an order
//! GET    /orders/order_history           - The caller's orders
//! GET    /orders/{orderId}               - One of the caller's orders
//!
//! # Products
//! GET    /products/getAll                - All products
//! GET    /products/category/{categoryId} - Products in a category
//! GET    /products/{id}                  - One product
//! POST   /products/create                - Create a product (auth)
//! DELETE /products/{id}                  - Delete a product (auth)
//!
//! # Categories (auth)
//! GET    /categories/getAll              - All categories
//! POST   /categories/create              - Create a category
//! DELETE /categories/{categoryId}        - Delete an unused category
//! ```

pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderValue, Request, Uri},
    middleware::from_fn,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::rate_limit::RateLimiterLayer;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Success envelope used by catalog and order endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

/// Wrap `data` in a success envelope.
pub fn envelope<T: Serialize>(message: &'static str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message,
        data,
    })
}

/// Create the credential routes (register and login).
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/logout", post(users::logout))
        .route("/profile", get(users::profile))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/order_place", post(orders::place))
        .route("/order_history", get(orders::history))
        .route("/{order_id}", get(orders::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/getAll", get(products::index))
        .route("/category/{category_id}", get(products::by_category))
        .route("/create", post(products::create))
        .route("/{id}", get(products::show).delete(products::delete))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/getAll", get(categories::index))
        .route("/create", post(categories::create))
        .route("/{category_id}", axum::routing::delete(categories::delete))
}

/// Create all routes except the credential endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/users", user_routes())
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
}

/// JSON 404 for paths no route matches.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

/// Build the full application.
///
/// `credential_limiter` wraps only the register and login routes; tests
/// pass `None` since they have no peer address to key on.
pub fn app(state: AppState, credential_limiter: Option<RateLimiterLayer>) -> Router {
    let credentials = match credential_limiter {
        Some(layer) => credential_routes().layer(layer),
        None => credential_routes(),
    };

    let cors = cors_layer(&state.config().cors_origins);

    credentials
        .merge(routes())
        .fallback(not_found)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
