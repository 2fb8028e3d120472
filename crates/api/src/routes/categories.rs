//! Category handlers. Every route requires a bearer token.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use bazaar_core::CategoryId;

use super::{Envelope, envelope};
use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::models::Category;
use crate::services::CatalogError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

/// `GET /categories/getAll`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_session): RequireAuth,
) -> Result<Json<Envelope<Vec<Category>>>> {
    let categories = state.catalog().list_categories().await?;
    Ok(envelope("Categories retrieved successfully", categories))
}

/// `POST /categories/create`
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_session): RequireAuth,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Envelope<Category>>)> {
    let category = state.catalog().create_category(&body.category_name).await?;
    Ok((
        StatusCode::CREATED,
        envelope("Category created successfully", category),
    ))
}

/// `DELETE /categories/{categoryId}`
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_session): RequireAuth,
    Path(category_id): Path<String>,
) -> Result<StatusCode> {
    let category_id: CategoryId = category_id
        .parse()
        .map_err(|_| CatalogError::CategoryNotFound)?;
    state.catalog().delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
