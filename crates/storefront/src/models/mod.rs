//! Domain models for the storefront.
//!
//! Input types (`New*`, `CheckoutRequest`) are what handlers hand to the
//! [`Store`](crate::db::Store); output types serialize straight into the JSON
//! payloads the storefront clients consume, so their field names are part of
//! the HTTP contract.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod review;
pub mod user;

pub use cart::CartLine;
pub use catalog::{Category, Product, ProductVariant};
pub use order::{
    CheckoutError, CheckoutItem, CheckoutRequest, OrderLine, OrderSummary, PaymentMethodInput,
};
pub use review::{NewReview, Review};
pub use user::{LoginRecord, NewUser, Profile};
