//! User repository (the credential store).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bazaar_core::{Email, UserId, UserRole};

use super::{PgStore, RepositoryError, map_write_error};
use crate::models::user::{NewUser, User};

/// Storage port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Get a user by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user and their password hash by email.
    async fn find_user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// List all users in registration order.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    avatar_url: Option<String>,
    role: UserRole,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: r.id,
            name: r.name,
            email,
            avatar_url: r.avatar_url,
            role: r.role,
            created_at: r.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, avatar_url, role, created_at";

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            r"
            INSERT INTO users (name, email, password_hash, avatar_url, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(password_hash)
        .bind(user.avatar_url.as_deref())
        .bind(user.role)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_write_error(e, "email already exists"))?;

        row.try_into()
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row: Option<UserCredentialsRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        Ok(Some((r.user.try_into()?, r.password_hash)))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(self.pool())
                .await?;

        rows.into_iter().map(User::try_from).collect()
    }
}
