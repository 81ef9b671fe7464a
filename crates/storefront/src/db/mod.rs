//! Data access for the storefront.
//!
//! # Stores
//!
//! Handlers talk to a single [`Store`] chosen once at startup:
//!
//! - [`PgStore`] - `PostgreSQL`, used whenever the connection pool comes up
//! - [`MockStore`] - in-memory fallback used when the pool cannot be created
//!   (database unreachable); the choice is sticky until the process restarts
//!
//! # Tables
//!
//! `users`, `address`, `category`, `product`, `product_variant`,
//! `product_image`, `review`, `cart`, `cart_item`, `payment_method`,
//! `payment`, `orders`, `order_item`, `user_preferences`.
//!
//! The reference DDL lives in `crates/storefront/schema.sql` and is applied
//! by the operator (no migration runner).

pub mod cart;
pub mod catalog;
pub mod demo;
pub mod mock;
pub mod orders;
pub mod postgres;
pub mod preferences;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use folkmint_core::{
    CartItemId, CategoryId, Email, OrderId, ProductId, ReviewId, UserId, VariantId,
};

use crate::config::{DatabaseConfig, StorefrontConfig};
use crate::models::{
    CartLine, Category, CheckoutRequest, LoginRecord, NewReview, NewUser, OrderSummary, Product,
    Profile, Review,
};

pub use cart::CartRepository;
pub use catalog::CatalogRepository;
pub use mock::MockStore;
pub use orders::OrderRepository;
pub use postgres::PgStore;
pub use preferences::PreferenceRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value cannot be stored (arithmetic overflow or out of column range).
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A referenced row does not exist (in-memory foreign key check).
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Which backend a [`Store`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Mock,
}

/// The storefront data access contract.
///
/// Every HTTP operation maps to exactly one method. Write methods are atomic:
/// either all of their statements take effect or none do.
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend behind this store.
    fn kind(&self) -> StoreKind;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Create a user and their first address.
    ///
    /// Fails with `Conflict` if the email is already registered.
    async fn create_user(&self, user: &NewUser) -> Result<UserId, RepositoryError>;

    /// Look up the login record for an email (exact match).
    async fn find_login(&self, email: &Email) -> Result<Option<LoginRecord>, RepositoryError>;

    /// Profile header for a user, `None` if the user does not exist.
    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError>;

    /// Orders of a user, newest first, with their lines.
    async fn order_history(&self, user_id: UserId) -> Result<Vec<OrderSummary>, RepositoryError>;

    /// Replace the street of the user's current address, creating the address
    /// if the user has none. Fails with `NotFound` for unknown users.
    async fn update_address(&self, user_id: UserId, street: &str) -> Result<(), RepositoryError>;

    /// All categories.
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Products, optionally restricted to one category.
    async fn list_products(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Reviews of a product with author display fields.
    async fn list_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError>;

    /// Store a review written by `user_id`.
    async fn create_review(
        &self,
        user_id: UserId,
        review: &NewReview,
    ) -> Result<ReviewId, RepositoryError>;

    /// Lines of the user's cart; empty when the user has no cart yet.
    async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError>;

    /// Add `quantity` of a variant, creating the cart on first use. Repeated
    /// adds of the same variant accumulate on a single line.
    async fn add_to_cart(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError>;

    /// Set the quantity of a cart line. Unknown ids are a no-op.
    async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError>;

    /// Delete a cart line. Unknown ids are a no-op.
    async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), RepositoryError>;

    /// Record payment method, payment, order and order items in one unit.
    async fn place_order(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<OrderId, RepositoryError>;

    /// Bump the user's product view counter.
    async fn record_view(&self, user_id: UserId, product_id: ProductId)
    -> Result<(), RepositoryError>;
}

/// Create the fixed-size `PostgreSQL` pool.
///
/// Requests beyond `pool_size` wait up to `acquire_timeout` for a connection
/// and then fail.
///
/// # Errors
///
/// Returns `sqlx::Error` if the settings are invalid or the first connection
/// cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = config
        .connect_options()
        .map_err(|e| sqlx::Error::Configuration(e.into()))?;

    PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
}

/// Pick the store for this process.
///
/// Falls back to a seeded [`MockStore`] when the pool cannot be created.
pub async fn open_store(config: &StorefrontConfig) -> Arc<dyn Store> {
    match create_pool(&config.database).await {
        Ok(pool) => {
            tracing::info!(
                pool_size = config.database.pool_size,
                "Database connection pool initialized"
            );
            Arc::new(PgStore::new(pool))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to create database pool, serving from the in-memory mock store"
            );
            Arc::new(MockStore::seeded(&config.images_url()))
        }
    }
}

/// Map a unique violation to `Conflict`, anything else to `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
