//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bazaar_core::EmailError),

    /// Name missing or blank.
    #[error("name is required")]
    InvalidName,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// User already exists.
    #[error("a user with this email already exists")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// No bearer token on the request.
    #[error("authentication token is missing")]
    MissingToken,

    /// Token could not be decoded or its signature is invalid.
    #[error("authentication token is invalid")]
    MalformedToken,

    /// Token signature is valid but its expiry has passed.
    #[error("authentication token has expired")]
    ExpiredToken,

    /// Token was revoked by logout.
    #[error("authentication token has been revoked")]
    TokenRevoked,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing error: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether this error rejects the caller's identity (an HTTP 401).
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingToken
                | Self::MalformedToken
                | Self::ExpiredToken
                | Self::TokenRevoked
        )
    }
}
