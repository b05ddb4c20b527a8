//! Domain types.
//!
//! These are validated domain objects, separate from the database row types
//! kept internal to the `db` modules. Response types serialize with
//! camelCase field names to match the public wire format.

pub mod order;
pub mod product;
pub mod user;

pub use order::{NewOrder, NewOrderItem, NewOrderLine, Order, OrderItem, OrderPatch};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{CurrentUser, UpsertUser, User};
