//! [`Store`] backed by `PostgreSQL`.

use async_trait::async_trait;
use sqlx::PgPool;

use folkmint_core::{
    CartItemId, CategoryId, Email, OrderId, ProductId, ReviewId, UserId, VariantId,
};

use super::{
    CartRepository, CatalogRepository, OrderRepository, PreferenceRepository, RepositoryError,
    ReviewRepository, Store, StoreKind, UserRepository,
};
use crate::models::{
    CartLine, Category, CheckoutRequest, LoginRecord, NewReview, NewUser, OrderSummary, Product,
    Profile, Review,
};

/// Store that delegates to the per-aggregate repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Postgres
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        UserRepository::new(&self.pool).create(user).await
    }

    async fn find_login(&self, email: &Email) -> Result<Option<LoginRecord>, RepositoryError> {
        UserRepository::new(&self.pool).find_login(email).await
    }

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        UserRepository::new(&self.pool).find_profile(user_id).await
    }

    async fn order_history(&self, user_id: UserId) -> Result<Vec<OrderSummary>, RepositoryError> {
        OrderRepository::new(&self.pool).history(user_id).await
    }

    async fn update_address(&self, user_id: UserId, street: &str) -> Result<(), RepositoryError> {
        UserRepository::new(&self.pool)
            .update_address(user_id, street)
            .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        CatalogRepository::new(&self.pool).categories().await
    }

    async fn list_products(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        CatalogRepository::new(&self.pool).products(category_id).await
    }

    async fn list_reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        ReviewRepository::new(&self.pool).for_product(product_id).await
    }

    async fn create_review(
        &self,
        user_id: UserId,
        review: &NewReview,
    ) -> Result<ReviewId, RepositoryError> {
        ReviewRepository::new(&self.pool).create(user_id, review).await
    }

    async fn cart_items(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        CartRepository::new(&self.pool).items(user_id).await
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError> {
        CartRepository::new(&self.pool)
            .add(user_id, variant_id, quantity)
            .await
    }

    async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool)
            .set_quantity(item_id, quantity)
            .await
    }

    async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool).remove(item_id).await
    }

    async fn place_order(
        &self,
        user_id: UserId,
        request: &CheckoutRequest,
    ) -> Result<OrderId, RepositoryError> {
        OrderRepository::new(&self.pool).place(user_id, request).await
    }

    async fn record_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        PreferenceRepository::new(&self.pool)
            .record_view(user_id, product_id)
            .await
    }
}
