//! Order line quantity.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantities start at one.
    #[error("quantity must be a positive integer (got {0})")]
    NotPositive(i64),
    /// The value does not fit the stored column.
    #[error("quantity must be at most {}", Quantity::MAX)]
    TooLarge,
}

/// A strictly positive number of units on an order line.
///
/// ```
/// use bazaar_core::Quantity;
///
/// assert!(Quantity::new(3).is_ok());
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Largest quantity accepted on a single line (fits a Postgres `INTEGER`).
    pub const MAX: u32 = i32::MAX as u32;

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` for zero or negative values and
    /// `QuantityError::TooLarge` above [`Quantity::MAX`].
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(QuantityError::TooLarge)
    }

    /// The number of units.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The number of units as stored in the database.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::new(-4), Err(QuantityError::NotPositive(-4)));
    }

    #[test]
    fn test_rejects_overflowing_column() {
        assert_eq!(
            Quantity::new(i64::from(i32::MAX) + 1),
            Err(QuantityError::TooLarge)
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let q: Quantity = serde_json::from_str("2").unwrap();
        assert_eq!(q.get(), 2);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("1.5").is_err());
    }
}
