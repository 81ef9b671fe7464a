//! Catalog repository: categories, products, variants and images.

use std::collections::HashMap;

use sqlx::PgPool;

use folkmint_core::{CategoryId, Price, ProductId, VariantId};

use super::RepositoryError;
use crate::models::{Category, Product, ProductVariant};

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: ProductId,
    name: String,
    description: Option<String>,
    base_price: Price,
    category_id: CategoryId,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    variant_id: VariantId,
    image_url: String,
}

/// Repository for read-only catalog queries.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, name, parent_category FROM category ORDER BY category_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Products with their variants and main image.
    ///
    /// Three queries regardless of catalog size: products, all their
    /// variants, and the first image of each product's first variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn products(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT product_id, name, description, base_price, category_id
            FROM product
            WHERE $1::INT IS NULL OR category_id = $1
            ORDER BY product_id
            ",
        )
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = rows.iter().map(|r| r.product_id.as_i32()).collect();

        let variants = sqlx::query_as::<_, ProductVariant>(
            r"
            SELECT variant_id, product_id, size, color, stock_quantity, price
            FROM product_variant
            WHERE product_id = ANY($1)
            ORDER BY product_id, variant_id
            ",
        )
        .bind(&product_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<ProductId, Vec<ProductVariant>> = HashMap::new();
        for variant in variants {
            by_product.entry(variant.product_id).or_default().push(variant);
        }

        let first_variants: Vec<i32> = by_product
            .values()
            .filter_map(|v| v.first())
            .map(|v| v.variant_id.as_i32())
            .collect();

        let images = sqlx::query_as::<_, ImageRow>(
            r"
            SELECT DISTINCT ON (variant_id) variant_id, image_url
            FROM product_image
            WHERE variant_id = ANY($1)
            ORDER BY variant_id, image_id
            ",
        )
        .bind(&first_variants)
        .fetch_all(self.pool)
        .await?;

        let images: HashMap<VariantId, String> = images
            .into_iter()
            .map(|row| (row.variant_id, row.image_url))
            .collect();

        let products = rows
            .into_iter()
            .map(|row| {
                let variants = by_product.remove(&row.product_id).unwrap_or_default();
                let main_image = variants
                    .first()
                    .and_then(|v| images.get(&v.variant_id).cloned());
                Product {
                    product_id: row.product_id,
                    name: row.name,
                    description: row.description,
                    base_price: row.base_price,
                    category_id: row.category_id,
                    main_image,
                    variants,
                }
            })
            .collect();

        Ok(products)
    }
}
