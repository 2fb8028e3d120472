//! Business logic services.
//!
//! Services borrow the storage port for the duration of one request.
//!
//! - `auth` - Registration, login, the token gate and the revocation ledger
//! - `catalog` - Categories and products
//! - `orders` - Order placement and retrieval

pub mod auth;
pub mod catalog;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService};
pub use orders::{OrderError, OrderService};
