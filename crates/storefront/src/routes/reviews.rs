//! Review route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use folkmint_core::{ProductId, ReviewId};

use super::UserQuery;
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, ApiPath, ApiQuery};
use crate::models::{NewReview, Review};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    pub message: &'static str,
    pub review_id: ReviewId,
}

/// Reviews of a product.
///
/// GET /api/products/{product_id}/reviews
///
/// # Errors
///
/// 500 if the store cannot be read.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
) -> Result<Json<Vec<Review>>> {
    Ok(Json(state.store().list_reviews(product_id).await?))
}

/// Write a review as `user_id`.
///
/// POST /api/reviews?user_id=
///
/// # Errors
///
/// 500 with the cause if the insert fails.
#[instrument(skip(state, review), fields(product_id = %review.product_id))]
pub async fn create(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
    ApiJson(review): ApiJson<NewReview>,
) -> Result<Json<CreateReviewResponse>> {
    let review_id = state
        .store()
        .create_review(query.user_id, &review)
        .await
        .map_err(AppError::write)?;

    Ok(Json(CreateReviewResponse {
        message: "Review submitted successfully",
        review_id,
    }))
}
