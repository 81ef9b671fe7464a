//! CLI command implementations.

pub mod check;
pub mod seed;
pub mod user;

use folkmint_storefront::config::StorefrontConfig;
use folkmint_storefront::db;
use sqlx::PgPool;

/// Load the storefront configuration and connect with it.
async fn connect() -> Result<(StorefrontConfig, PgPool), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!(
        host = %config.database.host,
        database = %config.database.name,
        "Connecting to database..."
    );
    let pool = db::create_pool(&config.database).await?;

    Ok((config, pool))
}
