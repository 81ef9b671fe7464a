//! Catalog route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use folkmint_core::CategoryId;

use crate::error::Result;
use crate::middleware::ApiQuery;
use crate::models::{Category, Product};
use crate::state::AppState;

/// Optional category filter.
#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
}

/// List all categories.
///
/// GET /api/categories
///
/// # Errors
///
/// 500 if the store cannot be read.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.store().list_categories().await?))
}

/// List products with their variants and main image.
///
/// GET /api/products
///
/// # Errors
///
/// 500 if the store cannot be read.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = state.store().list_products(filter.category_id).await?;
    Ok(Json(products))
}
