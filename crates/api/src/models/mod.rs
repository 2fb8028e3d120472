//! Domain models for the API.
//!
//! These types are validated domain objects, separate from database row types.
//! Response-facing models serialize with camelCase keys.

pub mod category;
pub mod order;
pub mod product;
pub mod revoked_token;
pub mod session;
pub mod user;

pub use category::Category;
pub use order::{LineItem, NewOrder, Order, OrderItem};
pub use product::{NewProduct, Product};
pub use revoked_token::RevokedToken;
pub use session::AuthenticatedUser;
pub use user::{NewUser, User};
