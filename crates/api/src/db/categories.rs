//! Category repository.

use async_trait::async_trait;

use bazaar_core::CategoryId;

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::Category;

/// Storage port for product categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    async fn create_category(&self, name: &str) -> Result<Category, RepositoryError>;

    /// List all categories in creation order.
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Look up a category by its exact name.
    async fn find_category_by_name(&self, name: &str)
    -> Result<Option<Category>, RepositoryError>;

    /// Delete a category. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if products still reference it.
    async fn delete_category(&self, id: CategoryId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
}

impl From<CategoryRow> for Category {
    fn from(r: CategoryRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[async_trait]
impl CategoryRepository for PgStore {
    async fn create_category(&self, name: &str) -> Result<Category, RepositoryError> {
        let row: CategoryRow =
            sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(self.pool())
                .await
                .map_err(|e| map_write_error(e, "category already exists"))?;

        Ok(row.into())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM categories WHERE name = $1")
                .bind(name)
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(Category::from))
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| map_write_error(e, "category still has products"))?;

        Ok(result.rows_affected() > 0)
    }
}
