//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored and computed as [`Decimal`] so that `10.00 * 2 + 5.00`
//! is exactly `25.00`. Every [`Price`] fits a `NUMERIC(12, 2)` column: at
//! most two decimal places, never negative, never above [`Price::max`].
//! Arithmetic is checked and yields `None` instead of leaving that range.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::Quantity;

/// Largest storable amount, in cents.
const MAX_CENTS: i64 = 999_999_999_999;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount is above [`Price::max`].
    #[error("price cannot exceed {}", Price::max())]
    TooLarge,
    /// The amount has fractions of a cent.
    #[error("price cannot have more than two decimal places")]
    TooPrecise,
}

/// A non-negative monetary amount in the store currency.
///
/// Serializes as a decimal string (`"19.99"`). Deserialization accepts either
/// a string or a JSON number and applies the same checks as [`Price::new`].
///
/// ```
/// use bazaar_core::{Price, Quantity};
/// use rust_decimal::Decimal;
///
/// let unit = Price::new(Decimal::new(1000, 2)).unwrap();
/// let line = unit.checked_times(Quantity::new(2).unwrap()).unwrap();
/// assert_eq!(line.amount(), Decimal::new(2000, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price, the identity for sums.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable price (`9999999999.99`).
    #[must_use]
    pub fn max() -> Self {
        Self(Decimal::new(MAX_CENTS, 2))
    }

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` below zero, `PriceError::TooLarge`
    /// above [`Price::max`] and `PriceError::TooPrecise` for fractions of a
    /// cent.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::max().0 {
            return Err(PriceError::TooLarge);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Same as [`Price::new`].
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price, or `None` if it would
    /// exceed [`Price::max`].
    #[must_use]
    pub fn checked_times(self, quantity: Quantity) -> Option<Self> {
        self.0
            .checked_mul(Decimal::from(quantity.get()))
            .and_then(|amount| Self::new(amount).ok())
    }

    /// Sum of two prices, or `None` if it would exceed [`Price::max`].
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0
            .checked_add(rhs.0)
            .and_then(|amount| Self::new(amount).ok())
    }

    /// Sum of all prices, or `None` if any partial sum exceeds [`Price::max`].
    pub fn checked_sum<I: IntoIterator<Item = Self>>(prices: I) -> Option<Self> {
        prices
            .into_iter()
            .try_fold(Self::ZERO, |acc, price| acc.checked_add(price))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
