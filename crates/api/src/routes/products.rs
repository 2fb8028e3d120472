//! Product handlers. Reads are public; writes require a bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use bazaar_core::{CategoryId, Price, ProductId};

use super::{Envelope, envelope};
use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::services::CatalogError;
use crate::services::catalog::ProductDraft;
use crate::state::AppState;

/// Create-product request body. `productId` is the business identifier.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_id: String,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_availability")]
    pub availability: bool,
    pub category_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

const fn default_availability() -> bool {
    true
}

/// `GET /products/getAll`
pub async fn index(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Product>>>> {
    let products = state.catalog().list_products().await?;
    Ok(envelope("Products retrieved successfully", products))
}

/// `GET /products/category/{categoryId}`
///
/// A category id that is not a number matches no products.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Envelope<Vec<Product>>>> {
    let products = match category_id.parse::<CategoryId>() {
        Ok(id) => state.catalog().products_in_category(id).await?,
        Err(_) => Vec::new(),
    };
    Ok(envelope("Products retrieved successfully", products))
}

/// `GET /products/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Product>>> {
    let id: ProductId = id.parse().map_err(|_| CatalogError::ProductNotFound)?;
    let product = state.catalog().get_product(id).await?;
    Ok(envelope("Product retrieved successfully", product))
}

/// `POST /products/create`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_session): RequireAuth,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Envelope<Product>>)> {
    let product = state
        .catalog()
        .create_product(ProductDraft {
            sku: body.product_id,
            title: body.title,
            price: body.price,
            description: body.description,
            availability: body.availability,
            category_name: body.category_name,
            image_url: body.image_url,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        envelope("Product created successfully", product),
    ))
}

/// `DELETE /products/{id}`
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_session): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id: ProductId = id.parse().map_err(|_| CatalogError::ProductNotFound)?;
    state.catalog().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
