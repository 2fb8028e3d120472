//! Authentication service.
//!
//! Registration and login against the credential store, plus the token gate
//! that every protected request passes through:
//!
//! 1. `MissingToken` when no token is presented
//! 2. `MalformedToken` when decoding or the signature check fails
//! 3. `ExpiredToken` when the embedded expiry has passed
//! 4. `TokenRevoked` when the revocation ledger holds the token

mod error;
mod password;
mod revocation;
mod token;

pub use error::AuthError;
pub use password::{CredentialHasher, MIN_PASSWORD_LENGTH};
pub use revocation::RevocationLedger;
pub use token::{IssuedToken, TOKEN_TTL_HOURS, TokenKeys, VerifiedToken};

use tracing::{debug, info, warn};

use bazaar_core::{Email, UserId, UserRole};

use crate::db::{RepositoryError, Storage};
use crate::models::{AuthenticatedUser, NewUser, User};

/// Input for registering a new account.
#[derive(Debug, Clone)]
pub struct Registration<'r> {
    pub name: &'r str,
    pub email: &'r str,
    pub password: &'r str,
    pub avatar_url: Option<&'r str>,
}

/// Authentication service.
pub struct AuthService<'a> {
    store: &'a dyn Storage,
    hasher: &'a CredentialHasher,
    keys: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        store: &'a dyn Storage,
        hasher: &'a CredentialHasher,
        keys: &'a TokenKeys,
    ) -> Self {
        Self {
            store,
            hasher,
            keys,
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName`, `AuthError::InvalidEmail` or
    /// `AuthError::WeakPassword` for bad input, and
    /// `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, input: Registration<'_>) -> Result<User, AuthError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidName);
        }
        let email = Email::parse(input.email)?;
        password::validate_password(input.password)?;

        let password_hash = self.hasher.hash(input.password)?;

        let new_user = NewUser {
            name: name.to_owned(),
            email,
            avatar_url: input
                .avatar_url
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            role: UserRole::default(),
        };

        let user = self
            .store
            .create_user(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown emails and wrong passwords fail identically, and both paths
    /// run one Argon2 verification.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, IssuedToken), AuthError> {
        let Ok(email) = Email::parse(email) else {
            self.hasher.verify_dummy(password);
            warn!("Login rejected: unparseable email");
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.store.find_user_credentials(&email).await? else {
            self.hasher.verify_dummy(password);
            warn!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = self.hasher.verify(password, &password_hash) {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(e);
        }

        let issued = self.keys.issue(user.id)?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, issued))
    }

    /// Run the token gate over an `Authorization` header value.
    ///
    /// Accepts `Bearer <token>` as well as a bare token.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in gate order.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let raw = bearer_token(authorization)?;
        let verified = self.keys.verify(raw)?;

        if RevocationLedger::new(self.store).is_revoked(raw).await? {
            debug!(user_id = %verified.user_id, "Rejected revoked token");
            return Err(AuthError::TokenRevoked);
        }

        Ok(AuthenticatedUser {
            user_id: verified.user_id,
            token: raw.to_owned(),
            expires_at: verified.expires_at,
        })
    }

    /// Revoke the session's token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the ledger cannot be written.
    pub async fn logout(&self, session: &AuthenticatedUser) -> Result<(), AuthError> {
        RevocationLedger::new(self.store).revoke(session).await?;
        info!(user_id = %session.user_id, "User logged out");
        Ok(())
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// List every registered user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list_users().await?)
    }
}

/// Extract the raw token from an `Authorization` header value.
fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.map(str::trim).unwrap_or_default();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use secrecy::SecretString;

    use super::*;
    use crate::config::PasswordHashingConfig;
    use crate::db::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        hasher: CredentialHasher,
        keys: TokenKeys,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: MemoryStore::new(),
                hasher: CredentialHasher::new(PasswordHashingConfig {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                })
                .unwrap(),
                keys: TokenKeys::new(&SecretString::from(
                    "k7Qz!m2Lr9#vX4pT8wY1nB6cF3hJ0sD5".to_owned(),
                )),
            }
        }

        fn auth(&self) -> AuthService<'_> {
            AuthService::new(&self.store, &self.hasher, &self.keys)
        }
    }

    fn registration<'r>(email: &'r str, password: &'r str) -> Registration<'r> {
        Registration {
            name: "Ada",
            email,
            password,
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_register_defaults_role_and_normalizes_email() {
        let f = Fixture::new();
        let user = f
            .auth()
            .register(registration(" Ada@Example.com ", "password1"))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "ada@example.com");
        assert_eq!(user.role, UserRole::Customer);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let f = Fixture::new();
        let auth = f.auth();
        auth.register(registration("a@x.io", "password1")).await.unwrap();
        let err = auth
            .register(registration("A@X.io", "password2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let f = Fixture::new();
        let auth = f.auth();
        assert!(matches!(
            auth.register(registration("a@x.io", "short")).await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.register(registration("not-an-email", "password1")).await,
            Err(AuthError::InvalidEmail(_))
        ));
        let blank = Registration {
            name: "  ",
            ..registration("a@x.io", "password1")
        };
        assert!(matches!(
            auth.register(blank).await,
            Err(AuthError::InvalidName)
        ));
    }

    #[tokio::test]
    async fn test_login_token_resolves_to_same_user() {
        let f = Fixture::new();
        let auth = f.auth();
        let user = auth.register(registration("a@x.io", "password1")).await.unwrap();

        let (logged_in, issued) = auth.login("a@x.io", "password1").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let header = format!("Bearer {}", issued.token);
        let session = auth.authenticate(Some(&header)).await.unwrap();
        assert_eq!(session.user_id, user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let f = Fixture::new();
        let auth = f.auth();
        auth.register(registration("a@x.io", "password1")).await.unwrap();

        let wrong_password = auth.login("a@x.io", "password2").await.unwrap_err();
        let unknown_email = auth.login("b@x.io", "password1").await.unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_gate_order() {
        let f = Fixture::new();
        let auth = f.auth();

        assert!(matches!(
            auth.authenticate(None).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            auth.authenticate(Some("Bearer ")).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            auth.authenticate(Some("Bearer garbage")).await,
            Err(AuthError::MalformedToken)
        ));

        let expired = f
            .keys
            .issue_at(UserId::new(1), Utc::now() - Duration::hours(25))
            .unwrap();
        assert!(matches!(
            auth.authenticate(Some(&expired.token)).await,
            Err(AuthError::ExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_on_next_request() {
        let f = Fixture::new();
        let auth = f.auth();
        auth.register(registration("a@x.io", "password1")).await.unwrap();
        let (_, issued) = auth.login("a@x.io", "password1").await.unwrap();

        let session = auth.authenticate(Some(&issued.token)).await.unwrap();
        auth.logout(&session).await.unwrap();
        auth.logout(&session).await.unwrap();

        for _ in 0..2 {
            assert!(matches!(
                auth.authenticate(Some(&issued.token)).await,
                Err(AuthError::TokenRevoked)
            ));
        }

        let (_, fresh) = auth.login("a@x.io", "password1").await.unwrap();
        assert!(auth.authenticate(Some(&fresh.token)).await.is_ok());
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_still_authenticates() {
        let f = Fixture::new();
        let auth = f.auth();
        let issued = f.keys.issue(UserId::new(99)).unwrap();

        let session = auth.authenticate(Some(&issued.token)).await.unwrap();
        assert!(matches!(
            auth.get_user(session.user_id).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn test_bearer_token_forms() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(Some("abc")).unwrap(), "abc");
        assert!(matches!(bearer_token(Some("  ")), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token(Some("Bearer")), Err(AuthError::MissingToken)));
    }
}
