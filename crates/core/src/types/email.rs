//! Login identifiers.
//!
//! An [`Email`] is the key a user signs in with, so it is normalized once at
//! the boundary: surrounding whitespace is dropped and the address is
//! lowercased. `Ada@Example.com` and `ada@example.com` are the same account.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Why a string was not accepted as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email is longer than {} characters", Email::MAX_LENGTH)]
    TooLong,
    /// Not of the form `mailbox@domain` with a dotless-or-dotted domain and
    /// no whitespace.
    #[error("email address is not valid")]
    Malformed,
}

/// A normalized email address.
///
/// ```
/// use bazaar_core::Email;
///
/// let email = Email::parse(" Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "ada@example.com");
/// assert!(Email::parse("ada@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Normalize and validate an address.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the trimmed input is blank, too long, or not a
    /// single `mailbox@domain` pair.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong);
        }

        let (mailbox, domain) = trimmed.split_once('@').ok_or(EmailError::Malformed)?;
        let well_formed = !mailbox.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !trimmed.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(EmailError::Malformed);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
