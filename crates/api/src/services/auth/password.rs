//! Argon2id password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;
use crate::config::PasswordHashingConfig;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashes and verifies passwords with fixed cost factors.
///
/// Holds a hash of a throwaway password so that a login for an unknown
/// email still pays for one full verification.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl CredentialHasher {
    /// Build a hasher from the configured cost factors.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the parameters are rejected.
    pub fn new(config: PasswordHashingConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|_| AuthError::PasswordHash)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(b"bazaar-timing-equalizer", &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)?;

        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on mismatch or an unreadable hash.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    /// Run a verification against the dummy hash and discard the result.
    pub fn verify_dummy(&self, password: &str) {
        // Only the time spent matters; the unknown-email path must cost a full verify.
        let _ = self.verify(password, &self.dummy_hash);
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

/// Validate password meets requirements.
pub(super) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}
