//! Revocation ledger entry.

use chrono::{DateTime, Utc};

use bazaar_core::UserId;

/// A bearer token invalidated before its natural expiry.
///
/// Rows are append-only. Once `expires_at` has passed the row is redundant
/// (the verifier already rejects the token) and may be purged.
#[derive(Clone, PartialEq, Eq)]
pub struct RevokedToken {
    /// The raw token string, the ledger key.
    pub token: String,
    /// Owner of the token.
    pub user_id: UserId,
    /// The token's original expiry.
    pub expires_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Whether the token would already be rejected as expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl std::fmt::Debug for RevokedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevokedToken")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
