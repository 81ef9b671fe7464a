//! Per-user browsing preferences.

use sqlx::PgPool;

use folkmint_core::{ProductId, UserId};

use super::RepositoryError;

/// Repository for the `user_preferences` counters.
pub struct PreferenceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PreferenceRepository<'a> {
    /// Create a new preference repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Increment the user's view counter, creating it at 1.
    ///
    /// The counter is kept per user; the viewed product is only logged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn record_view(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO user_preferences (user_id, view_count)
            VALUES ($1, 1)
            ON CONFLICT (user_id)
            DO UPDATE SET view_count = user_preferences.view_count + 1
            ",
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;

        tracing::debug!(%user_id, %product_id, "product view recorded");
        Ok(())
    }
}
