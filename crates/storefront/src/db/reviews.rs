//! Review repository.

use sqlx::PgPool;

use folkmint_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::{NewReview, Review};

/// Repository for product reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Reviews of a product with author display fields, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_product(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let reviews = sqlx::query_as::<_, Review>(
            r"
            SELECT r.review_id, r.rating, r.comment, r.user_id, r.product_id,
                   u.username, u.first_name
            FROM review r
            JOIN users u ON r.user_id = u.user_id
            WHERE r.product_id = $1
            ORDER BY r.review_id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Insert a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (e.g. unknown
    /// product or user).
    pub async fn create(
        &self,
        user_id: UserId,
        review: &NewReview,
    ) -> Result<ReviewId, RepositoryError> {
        let review_id = sqlx::query_scalar(
            r"
            INSERT INTO review (rating, comment, user_id, product_id)
            VALUES ($1, $2, $3, $4)
            RETURNING review_id
            ",
        )
        .bind(review.rating)
        .bind(&review.comment)
        .bind(user_id)
        .bind(review.product_id)
        .fetch_one(self.pool)
        .await?;

        Ok(review_id)
    }
}
