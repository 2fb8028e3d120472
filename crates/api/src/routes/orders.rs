//! Order handlers. Every route requires a bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use bazaar_core::OrderId;

use super::{Envelope, envelope};
use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{LineItem, Order};
use crate::services::OrderError;
use crate::state::AppState;

/// Place-order request body. Unknown fields, including any client-side
/// price, are ignored.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub products: Vec<LineItem>,
}

/// `POST /orders/order_place`
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    ApiJson(body): ApiJson<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Envelope<Order>>)> {
    let order = state
        .orders()
        .place_order(session.user_id, &body.products)
        .await?;

    Ok((
        StatusCode::CREATED,
        envelope("Order placed successfully", order),
    ))
}

/// `GET /orders/order_history`
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
) -> Result<Json<Envelope<Vec<Order>>>> {
    let orders = state.orders().history(session.user_id).await?;
    Ok(envelope("Order history retrieved successfully", orders))
}

/// `GET /orders/{orderId}`
///
/// Ids that are not numbers cannot name an order and get a 404.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(session): RequireAuth,
    Path(order_id): Path<String>,
) -> Result<Json<Envelope<Order>>> {
    let order_id: OrderId = order_id.parse().map_err(|_| OrderError::NotFound)?;
    let order = state.orders().get(order_id, session.user_id).await?;
    Ok(envelope("Order retrieved successfully", order))
}
