//! Load the demo catalog into `PostgreSQL`.
//!
//! Rows keep the demo IDs so links and carts built against the in-memory
//! store stay valid. Existing rows are left alone, so the command can be
//! re-run safely.

use sqlx::{Postgres, Transaction};
use tracing::info;

use folkmint_storefront::db::demo::{self, DEMO_CATEGORIES, DEMO_PRODUCTS, DEMO_STOCK};

/// Tables whose serial sequence must move past the explicit demo IDs.
const SEQUENCES: [(&str, &str); 4] = [
    ("category", "category_id"),
    ("product", "product_id"),
    ("product_variant", "variant_id"),
    ("product_image", "image_id"),
];

/// Seed categories, products, variants and images.
///
/// # Errors
///
/// Returns an error if configuration is invalid or any insert fails.
pub async fn demo_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let (config, pool) = super::connect().await?;
    let images_url = config.images_url();

    let mut tx = pool.begin().await?;

    let mut inserted = 0_u64;
    for (category_id, name) in DEMO_CATEGORIES {
        inserted += sqlx::query(
            r"
            INSERT INTO category (category_id, name, parent_category)
            VALUES ($1, $2, NULL)
            ON CONFLICT (category_id) DO NOTHING
            ",
        )
        .bind(category_id)
        .bind(name)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    info!(inserted, total = DEMO_CATEGORIES.len(), "Seeded categories");

    let mut inserted = 0_u64;
    for product in DEMO_PRODUCTS {
        inserted += sqlx::query(
            r"
            INSERT INTO product (product_id, name, description, base_price, category_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (product_id) DO NOTHING
            ",
        )
        .bind(product.product_id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.price().amount())
        .bind(product.category_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query(
            r"
            INSERT INTO product_variant (variant_id, product_id, size, color, stock_quantity, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (variant_id) DO NOTHING
            ",
        )
        .bind(product.variant_id)
        .bind(product.product_id)
        .bind(product.size)
        .bind(product.color)
        .bind(DEMO_STOCK)
        .bind(product.price().amount())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO product_image (variant_id, image_url)
            VALUES ($1, $2)
            ON CONFLICT (variant_id, image_url) DO NOTHING
            ",
        )
        .bind(product.variant_id)
        .bind(demo::image_url(&images_url, product.image))
        .execute(&mut *tx)
        .await?;
    }
    info!(inserted, total = DEMO_PRODUCTS.len(), "Seeded products");

    bump_sequences(&mut tx).await?;
    tx.commit().await?;

    info!("Demo catalog ready");
    Ok(())
}

/// Move each serial sequence to the current maximum ID.
async fn bump_sequences(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    for (table, column) in SEQUENCES {
        // Identifiers come from the constant above, never from input.
        let statement = format!(
            "SELECT setval(pg_get_serial_sequence('{table}', '{column}'), \
             COALESCE((SELECT MAX({column}) FROM {table}), 1))"
        );
        sqlx::query(&statement).execute(&mut **tx).await?;
    }
    Ok(())
}
