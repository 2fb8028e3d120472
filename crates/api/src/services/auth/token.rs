//! Bearer token issuing and verification.
//!
//! Tokens are HS256 JWTs carrying the user ID (`sub`), issue time, a fixed
//! 24 hour expiry and a random `jti`, so two logins in the same second still
//! yield distinct tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::UserId;

use super::AuthError;

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// A freshly minted token.
#[derive(Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Claims of a token that passed signature and expiry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    /// Build keys from the HMAC secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for `user_id`, valid for 24 hours from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if minted at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if encoding fails.
    pub fn issue_at(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let expires_at = issued_at + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::TokenSigning)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature and expiry, in that order.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ExpiredToken` for a well-signed token past its
    /// expiry and `AuthError::MalformedToken` for anything else that fails.
    pub fn verify(&self, raw: &str) -> Result<VerifiedToken, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(raw, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::MalformedToken,
            },
        )?;

        let user_id = data
            .claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::MalformedToken)?;
        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(AuthError::MalformedToken)?;

        Ok(VerifiedToken {
            user_id,
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}
