//! Product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bazaar_core::{CategoryId, Price, ProductId};

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::{NewProduct, Product};

/// Storage port for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the sku is taken or the
    /// category does not exist.
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError>;

    /// List all products in creation order.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// List the products in one category.
    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Get a product by ID.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Fetch several products in one read. Missing IDs are simply absent
    /// from the result.
    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Look up a product by its sku.
    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError>;

    /// Number of products referencing a category.
    async fn count_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<i64, RepositoryError>;

    /// Delete a product. Returns `false` if it did not exist.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    sku: String,
    title: String,
    price: Price,
    description: String,
    availability: bool,
    category_id: CategoryId,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id,
            sku: r.sku,
            title: r.title,
            price: r.price,
            description: r.description,
            availability: r.availability,
            category_id: r.category_id,
            image_url: r.image_url,
            created_at: r.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, sku, title, price, description, availability, category_id, image_url, created_at";

#[async_trait]
impl ProductRepository for PgStore {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO products (sku, title, price, description, availability, category_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.sku)
        .bind(&product.title)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.availability)
        .bind(product.category_id)
        .bind(product.image_url.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "product id already exists or category is missing"))?;

        Ok(row.into())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
                .fetch_all(self.pool())
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = $1 ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(Product::from))
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = $1"))
                .bind(sku)
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(Product::from))
    }

    async fn count_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(self.pool())
                .await?;

        Ok(count)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
