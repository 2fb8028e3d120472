//! Request-scoped authentication state.

use chrono::{DateTime, Utc};

use bazaar_core::UserId;

/// Identity established by the token gate for one request.
///
/// Holds the raw token so that logout can revoke exactly what was presented.
/// The referenced user may have been deleted since the token was issued.
#[derive(Clone)]
pub struct AuthenticatedUser {
    /// Identity claim from the token.
    pub user_id: UserId,
    /// The raw bearer token.
    pub token: String,
    /// Absolute expiry embedded in the token.
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
