//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Database
//! - `DATABASE_URL` - Full `PostgreSQL` URL; when set it wins over the parts below
//! - `DB_HOST` - Database host (default: localhost)
//! - `DB_PORT` - Database port (default: 5432)
//! - `DB_USER` - Database user (default: postgres)
//! - `DB_PASSWORD` - Database password (default: empty)
//! - `DB_NAME` - Database name (default: ecommerce)
//! - `DB_POOL_SIZE` - Fixed connection pool size (default: 5)
//! - `DB_ACQUIRE_TIMEOUT_SECS` - Max wait for a pooled connection (default: 10)
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `STOREFRONT_PUBLIC_URL` - Public base URL, used for image links (default: `http://localhost:8000`)
//! - `STOREFRONT_IMAGES_DIR` - Directory served under `/images` (default: `gemini_img`)
//! - `STOREFRONT_CORS_ORIGINS` - Comma-separated allowed origins
//!   (default: `http://localhost:5173,http://127.0.0.1:5173`)
//!
//! ## Optional
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Relational store connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this service (no trailing slash)
    pub public_url: String,
    /// Directory with product images served under `/images`
    pub images_dir: PathBuf,
    /// Origins allowed by the CORS layer
    pub cors_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Database connection settings.
///
/// Implements `Debug` manually to redact the password and URL.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL, overrides the individual parts
    pub url: Option<SecretString>,
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database user
    pub user: String,
    /// Database password
    pub password: SecretString,
    /// Database name
    pub name: String,
    /// Fixed number of pooled connections
    pub pool_size: u32,
    /// How long a request waits for a pooled connection before failing
    pub acquire_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("pool_size", &self.pool_size)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig::from_env()?;
        // Fail fast on a malformed DATABASE_URL
        database.connect_options()?;
        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "8000")?;
        let public_url = get_env_or_default("STOREFRONT_PUBLIC_URL", "http://localhost:8000")
            .trim_end_matches('/')
            .to_owned();
        let images_dir = PathBuf::from(get_env_or_default("STOREFRONT_IMAGES_DIR", "gemini_img"));
        let cors_origins =
            parse_origins(&get_env_or_default("STOREFRONT_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));

        Ok(Self {
            database,
            host,
            port,
            public_url,
            images_dir,
            cors_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Base URL under which product images are published.
    #[must_use]
    pub fn images_url(&self) -> String {
        format!("{}/images", self.public_url)
    }
}

impl DatabaseConfig {
    /// Load database settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable numbers.
    pub fn from_env() -> Result<Self, ConfigError> {
        let pool_size = parse_env_or_default::<u32>("DB_POOL_SIZE", "5")?;
        if pool_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DB_POOL_SIZE".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            url: get_optional_env("DATABASE_URL").map(SecretString::from),
            host: get_env_or_default("DB_HOST", "localhost"),
            port: parse_env_or_default::<u16>("DB_PORT", "5432")?,
            user: get_env_or_default("DB_USER", "postgres"),
            password: SecretString::from(get_env_or_default("DB_PASSWORD", "")),
            name: get_env_or_default("DB_NAME", "ecommerce"),
            pool_size,
            acquire_timeout: Duration::from_secs(parse_env_or_default::<u64>(
                "DB_ACQUIRE_TIMEOUT_SECS",
                "10",
            )?),
        })
    }

    /// Build `sqlx` connect options from these settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `DATABASE_URL` is malformed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url.expose_secret()).map_err(|e| {
                ConfigError::InvalidEnvVar("DATABASE_URL".to_owned(), e.to_string())
            });
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable; empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_owned())
        .collect()
}
