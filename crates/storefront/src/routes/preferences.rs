//! Browsing preferences.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use folkmint_core::ProductId;

use super::UserQuery;
use crate::error::{AppError, Result};
use crate::middleware::{ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Count a product view for a user.
///
/// POST /api/user/preference/view/{product_id}?user_id=
///
/// # Errors
///
/// 500 with the cause if the counter cannot be written.
#[instrument(skip(state))]
pub async fn track_view(
    State(state): State<AppState>,
    ApiPath(product_id): ApiPath<ProductId>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<StatusResponse>> {
    state
        .store()
        .record_view(query.user_id, product_id)
        .await
        .map_err(AppError::write)?;

    Ok(Json(StatusResponse { status: "updated" }))
}
