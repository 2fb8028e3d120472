//! Revocation ledger maintenance.

use chrono::Utc;
use tracing::info;

use bazaar_api::db::{self, PgStore};
use bazaar_api::services::auth::RevocationLedger;

use super::database_url;

/// Delete ledger entries for tokens that have expired.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn purge() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;
    let store = PgStore::new(db::create_pool(&database_url).await?);

    let removed = RevocationLedger::new(&store)
        .purge_expired(Utc::now())
        .await?;

    info!(removed, "Revocation ledger purged");
    Ok(())
}
