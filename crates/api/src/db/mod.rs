//! Storage ports and adapters.
//!
//! # Ports
//!
//! One trait per entity, combined into [`Storage`]:
//!
//! - [`UserRepository`] - Credential store (users and password hashes)
//! - [`CategoryRepository`] - Product categories
//! - [`ProductRepository`] - Catalog products
//! - [`OrderRepository`] - Placed order snapshots
//! - [`RevokedTokenRepository`] - Revocation ledger rows
//!
//! # Adapters
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx
//! - [`MemoryStore`] - In-process store for tests and local development
//!
//! # Tables
//!
//! - `users` - Accounts with Argon2id password hashes (unique email)
//! - `categories` - Unique category names
//! - `products` - Catalog (unique `sku`, restricted FK to `categories`)
//! - `orders` / `order_items` - Order snapshots, lines ordered by `position`
//! - `revoked_tokens` - Denylisted bearer tokens (unique `token`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

pub mod categories;
pub mod memory;
pub mod orders;
pub mod products;
pub mod revoked_tokens;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use revoked_tokens::RevokedTokenRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (unique key or referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Every port the API needs, behind one object.
#[async_trait]
pub trait Storage:
    UserRepository
    + CategoryRepository
    + ProductRepository
    + OrderRepository
    + RevokedTokenRepository
{
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// `PostgreSQL` implementation of every storage port.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a failed write, turning constraint violations into `Conflict`.
fn map_write_error(err: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
    {
        return RepositoryError::Conflict(conflict.to_owned());
    }
    RepositoryError::Database(err)
}
