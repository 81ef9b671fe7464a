//! Database connectivity check.

/// Connect with the storefront settings and report the server version.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the database is unreachable.
pub async fn database() -> Result<(), Box<dyn std::error::Error>> {
    let (_, pool) = super::connect().await?;

    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(&pool)
        .await?;

    tracing::info!(%version, "Database reachable");
    Ok(())
}
