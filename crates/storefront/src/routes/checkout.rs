//! Checkout.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use folkmint_core::OrderId;

use super::UserQuery;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ApiJson, ApiQuery};
use crate::models::CheckoutRequest;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub order_id: OrderId,
}

/// Place an order from the submitted lines.
///
/// POST /api/checkout?user_id=
///
/// Prices are taken from the request. The cart is left untouched and stock is
/// not decremented.
///
/// # Errors
///
/// 400 if a price has sub-cent precision or the total is too large to store.
/// 500 with the cause if any part of the order cannot be written; nothing is
/// persisted in that case.
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn checkout(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    add_breadcrumb("checkout", "Checkout submitted", None);

    request
        .total()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let order_id = state
        .store()
        .place_order(query.user_id, &request)
        .await
        .map_err(AppError::write)?;

    Ok(Json(CheckoutResponse {
        message: "Order placed successfully",
        order_id,
    }))
}
