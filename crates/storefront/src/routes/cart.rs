//! Cart route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use folkmint_core::{CartItemId, UserId, VariantId};

use super::{MessageResponse, UserQuery};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ApiJson, ApiPath, ApiQuery};
use crate::models::CartLine;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub variant_id: VariantId,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct QuantityQuery {
    pub quantity: i32,
}

/// Lines of a user's cart.
///
/// GET /api/cart/{user_id}
///
/// # Errors
///
/// 500 if the store cannot be read.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<CartResponse>> {
    let items = state.store().cart_items(user_id).await?;
    Ok(Json(CartResponse { items }))
}

/// Add a variant; repeated adds accumulate on one line.
///
/// POST /api/cart/add?user_id=
///
/// # Errors
///
/// 500 with the cause if the write fails.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
    ApiJson(item): ApiJson<AddToCart>,
) -> Result<Json<MessageResponse>> {
    state
        .store()
        .add_to_cart(query.user_id, item.variant_id, item.quantity)
        .await
        .map_err(AppError::write)?;

    let variant_id = item.variant_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("variant_id", variant_id.as_str())]),
    );

    Ok(Json(MessageResponse::new("Item added to cart")))
}

/// Set the quantity of a cart line.
///
/// PUT /api/cart/item/{item_id}?quantity=
///
/// # Errors
///
/// 500 with the cause if the write fails.
#[instrument(skip(state))]
pub async fn update_item(
    State(state): State<AppState>,
    ApiPath(item_id): ApiPath<CartItemId>,
    ApiQuery(query): ApiQuery<QuantityQuery>,
) -> Result<Json<MessageResponse>> {
    state
        .store()
        .update_cart_item(item_id, query.quantity)
        .await
        .map_err(AppError::write)?;

    Ok(Json(MessageResponse::new("Quantity updated")))
}

/// Remove a cart line.
///
/// DELETE /api/cart/item/{item_id}
///
/// # Errors
///
/// 500 with the cause if the write fails.
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    ApiPath(item_id): ApiPath<CartItemId>,
) -> Result<Json<MessageResponse>> {
    state
        .store()
        .remove_cart_item(item_id)
        .await
        .map_err(AppError::write)?;

    Ok(Json(MessageResponse::new("Item removed from cart")))
}
