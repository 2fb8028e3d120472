//! Revocation ledger (token denylist).
//!
//! Every protected request consults the ledger after the token's signature
//! and expiry check. Lookups always hit storage so that a logout takes
//! effect on the very next request.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::AuthError;
use crate::db::Storage;
use crate::models::{AuthenticatedUser, RevokedToken};

/// Append-only set of revoked tokens.
pub struct RevocationLedger<'a> {
    store: &'a dyn Storage,
}

impl<'a> RevocationLedger<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Storage) -> Self {
        Self { store }
    }

    /// Revoke the token held by an authenticated session.
    ///
    /// Revoking a token twice leaves it revoked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the ledger cannot be written.
    pub async fn revoke(&self, session: &AuthenticatedUser) -> Result<(), AuthError> {
        let entry = RevokedToken {
            token: session.token.clone(),
            user_id: session.user_id,
            expires_at: session.expires_at,
        };
        self.store.insert_revoked_token(&entry).await?;
        debug!(user_id = %session.user_id, "Token added to revocation ledger");
        Ok(())
    }

    /// Whether `token` has been revoked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the ledger cannot be read.
    pub async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.store.is_token_revoked(token).await?)
    }

    /// Drop entries whose token had already expired at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the ledger cannot be written.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let removed = self.store.purge_revoked_tokens(now).await?;
        info!(removed, "Purged expired revocation entries");
        Ok(removed)
    }
}
