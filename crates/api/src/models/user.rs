//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{Email, UserId, UserRole};

/// A registered user (domain type).
///
/// The password hash is deliberately not part of this type; it only leaves
/// the store through `UserRepository::find_user_credentials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: Email,
    /// Avatar image reference.
    pub avatar_url: Option<String>,
    /// Account role. Recorded, never enforced.
    pub role: UserRole,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub avatar_url: Option<String>,
    pub role: UserRole,
}
