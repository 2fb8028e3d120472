//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! categories:
//!   - name: Home
//!     products:
//!       - productId: LAMP-1
//!         title: Desk lamp
//!         price: "19.99"
//!         description: Warm white, dimmable
//!         imageUrl: https://cdn.example.com/lamp.jpg
//! ```
//!
//! Categories and products that already exist are skipped, so the command
//! can be re-run safely.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use bazaar_api::db::{self, PgStore, Storage};
use bazaar_api::services::catalog::{CatalogError, CatalogService, ProductDraft};
use bazaar_core::Price;

use super::database_url;

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedCatalog {
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedProduct {
    pub product_id: String,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_availability")]
    pub availability: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

const fn default_availability() -> bool {
    true
}

/// Counts from one seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub products_created: usize,
    pub skipped: usize,
}

/// Seed the catalog from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// database is unreachable.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and parse YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedCatalog = serde_yaml::from_str(&content)?;
    info!(categories = seed.categories.len(), "Parsed catalog");

    let database_url = database_url()?;
    let store = PgStore::new(db::create_pool(&database_url).await?);
    info!("Connected to database");

    let summary = apply(&store, &seed).await?;

    info!("Seeding complete!");
    info!("  Categories created: {}", summary.categories_created);
    info!("  Products created: {}", summary.products_created);
    info!("  Skipped (already exist): {}", summary.skipped);

    Ok(())
}

/// Create every category and product in `seed` that doesn't exist yet.
///
/// # Errors
///
/// Returns the first error that isn't a duplicate.
pub async fn apply(store: &dyn Storage, seed: &SeedCatalog) -> Result<SeedSummary, CatalogError> {
    let catalog = CatalogService::new(store);
    let mut summary = SeedSummary::default();

    for category in &seed.categories {
        match catalog.create_category(&category.name).await {
            Ok(_) => summary.categories_created += 1,
            Err(CatalogError::DuplicateCategory) => summary.skipped += 1,
            Err(e) => return Err(e),
        }

        for product in &category.products {
            let draft = ProductDraft {
                sku: product.product_id.clone(),
                title: product.title.clone(),
                price: product.price,
                description: product.description.clone(),
                availability: product.availability,
                category_name: category.name.clone(),
                image_url: product.image_url.clone(),
            };

            match catalog.create_product(draft).await {
                Ok(_) => summary.products_created += 1,
                Err(CatalogError::DuplicateProduct) => {
                    warn!(product_id = %product.product_id, "Product already exists, skipping");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(summary)
}
