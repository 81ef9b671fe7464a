//! Cart repository.
//!
//! A user has at most one cart (unique `cart.user_id`) and a cart holds at
//! most one line per variant (unique `(cart_id, variant_id)`). Both are
//! maintained with `ON CONFLICT` upserts so concurrent adds accumulate
//! instead of racing.

use sqlx::PgPool;

use folkmint_core::{CartId, CartItemId, UserId, VariantId};

use super::RepositoryError;
use crate::models::CartLine;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Lines of the user's cart, empty if the user has no cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.cart_item_id, ci.quantity, ci.cart_id, ci.variant_id,
                   p.name, pv.price, pv.color, pv.size
            FROM cart c
            JOIN cart_item ci ON ci.cart_id = c.cart_id
            JOIN product_variant pv ON ci.variant_id = pv.variant_id
            JOIN product p ON pv.product_id = p.product_id
            WHERE c.user_id = $1
            ORDER BY ci.cart_item_id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a quantity of a variant, creating the cart and line as needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails; nothing is
    /// written in that case.
    pub async fn add(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // DO UPDATE (not DO NOTHING) so RETURNING yields the existing row.
        let cart_id: CartId = sqlx::query_scalar(
            r"
            INSERT INTO cart (user_id) VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING cart_id
            ",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let item_id: CartItemId = sqlx::query_scalar(
            r"
            INSERT INTO cart_item (quantity, cart_id, variant_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, variant_id)
            DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity
            RETURNING cart_item_id
            ",
        )
        .bind(quantity)
        .bind(cart_id)
        .bind(variant_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(item_id)
    }

    /// Set the quantity of a line. Unknown ids update nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_quantity(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        // TODO: scope by cart owner once requests carry an authenticated user.
        let result = sqlx::query("UPDATE cart_item SET quantity = $1 WHERE cart_item_id = $2")
            .bind(quantity)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(%item_id, "cart item not found, nothing updated");
        }
        Ok(())
    }

    /// Delete a line. Unknown ids delete nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(&self, item_id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE cart_item_id = $1")
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(%item_id, "cart item not found, nothing deleted");
        }
        Ok(())
    }
}
