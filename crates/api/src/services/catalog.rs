//! Categories and products.

use thiserror::Error;
use tracing::info;

use bazaar_core::{CategoryId, Price, ProductId};

use crate::db::{RepositoryError, Storage};
use crate::models::{Category, NewProduct, Product};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A required text field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A category with this name already exists.
    #[error("category already exists")]
    DuplicateCategory,

    /// The category is still referenced by products.
    #[error("category still has products")]
    CategoryInUse,

    /// No category with the given name.
    #[error("category '{0}' not found")]
    UnknownCategory(String),

    /// A product with this business identifier already exists.
    #[error("a product with this productId already exists")]
    DuplicateProduct,

    /// Category not found.
    #[error("category not found")]
    CategoryNotFound,

    /// Product not found.
    #[error("product not found")]
    ProductNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Input for creating a product; the category is referenced by name.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub sku: String,
    pub title: String,
    pub price: Price,
    pub description: String,
    pub availability: bool,
    pub category_name: String,
    pub image_url: Option<String>,
}

/// Catalog service.
pub struct CatalogService<'a> {
    store: &'a dyn Storage,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Storage) -> Self {
        Self { store }
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingField` for a blank name and
    /// `CatalogError::DuplicateCategory` if the name is taken.
    pub async fn create_category(&self, name: &str) -> Result<Category, CatalogError> {
        let name = required(name, "categoryName")?;

        let category = self
            .store
            .create_category(name)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CatalogError::DuplicateCategory,
                other => CatalogError::Repository(other),
            })?;

        info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    /// Delete a category that no product references.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryInUse` if products reference it and
    /// `CatalogError::CategoryNotFound` if it doesn't exist.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        if self.store.count_products_in_category(id).await? > 0 {
            return Err(CatalogError::CategoryInUse);
        }

        let deleted = self.store.delete_category(id).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CatalogError::CategoryInUse,
            other => CatalogError::Repository(other),
        })?;
        if !deleted {
            return Err(CatalogError::CategoryNotFound);
        }

        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    /// Create a product in an existing category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingField`, `CatalogError::UnknownCategory`
    /// or `CatalogError::DuplicateProduct`.
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let sku = required(&draft.sku, "productId")?;
        let title = required(&draft.title, "title")?;
        let category_name = required(&draft.category_name, "categoryName")?;

        let category = self
            .store
            .find_category_by_name(category_name)
            .await?
            .ok_or_else(|| CatalogError::UnknownCategory(category_name.to_owned()))?;

        if self.store.find_product_by_sku(sku).await?.is_some() {
            return Err(CatalogError::DuplicateProduct);
        }

        let product = self
            .store
            .create_product(&NewProduct {
                sku: sku.to_owned(),
                title: title.to_owned(),
                price: draft.price,
                description: draft.description.trim().to_owned(),
                availability: draft.availability,
                category_id: category.id,
                image_url: draft.image_url.filter(|s| !s.trim().is_empty()),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CatalogError::DuplicateProduct,
                other => CatalogError::Repository(other),
            })?;

        info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_products().await?)
    }

    /// List products in a category. An unknown category yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.store.list_products_by_category(category_id).await?)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if it doesn't exist.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .get_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Delete a product. Orders already placed keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if it doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        if !self.store.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound);
        }
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn required<'s>(value: &'s str, field: &'static str) -> Result<&'s str, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::MissingField(field));
    }
    Ok(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn draft(sku: &str, category: &str) -> ProductDraft {
        ProductDraft {
            sku: sku.to_owned(),
            title: "Desk lamp".to_owned(),
            price: Price::from_cents(1999).unwrap(),
            description: "Warm light".to_owned(),
            availability: true,
            category_name: category.to_owned(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);
        catalog.create_category("Home").await.unwrap();
        assert!(matches!(
            catalog.create_category("Home").await,
            Err(CatalogError::DuplicateCategory)
        ));
        assert!(matches!(
            catalog.create_category("   ").await,
            Err(CatalogError::MissingField("categoryName"))
        ));
    }

    #[tokio::test]
    async fn test_product_needs_known_category_and_unique_sku() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);

        assert!(matches!(
            catalog.create_product(draft("LAMP-1", "Home")).await,
            Err(CatalogError::UnknownCategory(_))
        ));

        let home = catalog.create_category("Home").await.unwrap();
        let lamp = catalog.create_product(draft("LAMP-1", "Home")).await.unwrap();
        assert_eq!(lamp.category_id, home.id);

        assert!(matches!(
            catalog.create_product(draft("LAMP-1", "Home")).await,
            Err(CatalogError::DuplicateProduct)
        ));
    }

    #[tokio::test]
    async fn test_category_delete_restricted_while_products_exist() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);
        let home = catalog.create_category("Home").await.unwrap();
        let lamp = catalog.create_product(draft("LAMP-1", "Home")).await.unwrap();

        assert!(matches!(
            catalog.delete_category(home.id).await,
            Err(CatalogError::CategoryInUse)
        ));

        catalog.delete_product(lamp.id).await.unwrap();
        catalog.delete_category(home.id).await.unwrap();
        assert!(matches!(
            catalog.delete_category(home.id).await,
            Err(CatalogError::CategoryNotFound)
        ));
    }

    #[tokio::test]
    async fn test_products_by_category_and_lookup() {
        let store = MemoryStore::new();
        let catalog = CatalogService::new(&store);
        let home = catalog.create_category("Home").await.unwrap();
        let garden = catalog.create_category("Garden").await.unwrap();
        let lamp = catalog.create_product(draft("LAMP-1", "Home")).await.unwrap();

        assert_eq!(catalog.products_in_category(home.id).await.unwrap(), vec![lamp.clone()]);
        assert!(catalog.products_in_category(garden.id).await.unwrap().is_empty());
        assert_eq!(catalog.get_product(lamp.id).await.unwrap(), lamp);
        assert!(matches!(
            catalog.get_product(ProductId::new(999)).await,
            Err(CatalogError::ProductNotFound)
        ));
    }
}
