//! Entity identifiers.
//!
//! Every table uses a serial `INTEGER` key. Each entity gets its own newtype
//! so a product id can never be passed where an order id is expected.

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                self.0.fmt(f)
            }
        }

        /// Path segments such as `/orders/42`.
        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

entity_id!(
    /// Primary key of `users`.
    UserId
);
entity_id!(
    /// Primary key of `categories`.
    CategoryId
);
entity_id!(
    /// Primary key of `products`.
    ProductId
);
entity_id!(
    /// Primary key of `orders`.
    OrderId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_path_segment() {
        let id: OrderId = "42".parse().unwrap();
        assert_eq!(id, OrderId::new(42));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("64f1c2a9e4b0".parse::<OrderId>().is_err());
        assert!("".parse::<OrderId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed.as_i32(), 7);
    }

    #[test]
    fn test_ids_order_numerically() {
        assert!(ProductId::new(2) < ProductId::new(10));
        assert_eq!(UserId::new(3).to_string(), "3");
    }
}
