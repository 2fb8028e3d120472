//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bazaar-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BAZAAR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/api/migrations/`:
//! ```text
//! migrations/
//! ├── 20261019000001_create_users.sql
//! ├── 20261019000002_create_catalog.sql
//! ├── 20261019000003_create_orders.sql
//! └── 20261019000004_create_revoked_tokens.sql
//! ```

use tracing::info;

use bazaar_api::db;

use super::database_url;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
