//! Account page: profile, order history and address.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use folkmint_core::UserId;

use super::MessageResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, ApiPath};
use crate::models::{OrderSummary, Profile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub orders: Vec<OrderSummary>,
}

#[derive(Debug, Deserialize)]
pub struct AddressUpdate {
    /// New street line.
    pub address: String,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_owned())
}

/// Profile header and order history, newest order first.
///
/// GET /api/user/profile/{user_id}
///
/// # Errors
///
/// 404 if the user does not exist.
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<ProfileResponse>> {
    let store = state.store();

    let profile = store
        .find_profile(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    let orders = store.order_history(user_id).await?;

    Ok(Json(ProfileResponse { profile, orders }))
}

/// Replace the street of the user's address, creating one if needed.
///
/// PUT /api/user/profile/{user_id}/address
///
/// # Errors
///
/// 404 if the user does not exist.
#[instrument(skip(state, body))]
pub async fn update_address(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
    ApiJson(body): ApiJson<AddressUpdate>,
) -> Result<Json<MessageResponse>> {
    state
        .store()
        .update_address(user_id, &body.address)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            other => AppError::write(other),
        })?;

    Ok(Json(MessageResponse::new("Address updated successfully")))
}
