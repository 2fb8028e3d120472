//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod quantity;
pub mod role;

pub use email::{Email, EmailError};
pub use id::{CategoryId, OrderId, ProductId, UserId};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use role::UserRole;
