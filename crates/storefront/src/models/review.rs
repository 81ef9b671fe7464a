//! Product reviews.

use serde::{Deserialize, Serialize};

use folkmint_core::{ProductId, ReviewId, UserId};

/// Body of `POST /api/reviews`.
///
/// The rating is stored as given: there is no range check and no check that
/// the author bought the product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub rating: i32,
    pub comment: String,
    pub product_id: ProductId,
}

/// A review joined with its author's display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Review {
    pub review_id: ReviewId,
    pub rating: i32,
    pub comment: Option<String>,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub username: String,
    pub first_name: Option<String>,
}
