//! Revocation ledger storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{PgStore, RepositoryError};
use crate::models::RevokedToken;

/// Storage port for revoked bearer tokens.
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Record a revoked token. Recording the same token twice is a no-op.
    async fn insert_revoked_token(&self, entry: &RevokedToken) -> Result<(), RepositoryError>;

    /// Whether the exact token string has been revoked.
    async fn is_token_revoked(&self, token: &str) -> Result<bool, RepositoryError>;

    /// Delete entries whose token expired at or before `now`.
    /// Returns the number of rows removed.
    async fn purge_revoked_tokens(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

#[async_trait]
impl RevokedTokenRepository for PgStore {
    async fn insert_revoked_token(&self, entry: &RevokedToken) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO revoked_tokens (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO NOTHING
            ",
        )
        .bind(&entry.token)
        .bind(entry.user_id)
        .bind(entry.expires_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE token = $1)")
                .bind(token)
                .fetch_one(self.pool())
                .await?;

        Ok(exists)
    }

    async fn purge_revoked_tokens(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
