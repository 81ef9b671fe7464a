//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! fm-cli user create -e staff@folkmint.com -p secret -f Rina -l Akter -r admin
//! ```

use secrecy::SecretString;
use thiserror::Error;

use folkmint_core::{Email, UserRole};
use folkmint_storefront::config::{ConfigError, StorefrontConfig};
use folkmint_storefront::db::{self, RepositoryError, UserRepository};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Environment could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: customer, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Insert failed.
    #[error("Failed to create user: {0}")]
    Repository(RepositoryError),
}

/// Create a user with the given role.
///
/// # Returns
///
/// Nothing; the new user ID is logged.
///
/// # Errors
///
/// Returns `UserError` for bad input, a duplicate email or database failures.
pub async fn create(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
) -> Result<(), UserError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email).map_err(|e| UserError::InvalidEmail(e.to_string()))?;

    let config = StorefrontConfig::from_env()?;
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database).await?;

    tracing::info!("Creating user: {} ({})", email, role);
    let user_id = UserRepository::new(&pool)
        .create_with_role(
            &email,
            &SecretString::from(password.to_owned()),
            first_name,
            last_name,
            role,
        )
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UserExists(email.to_string()),
            other => UserError::Repository(other),
        })?;

    tracing::info!("Created user with ID: {}", user_id);
    Ok(())
}
