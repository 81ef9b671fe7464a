//! User repository: accounts, login lookups and addresses.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use folkmint_core::{Email, UserId, UserRole};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::{DEFAULT_CITY, DEFAULT_COUNTRY, DEFAULT_POSTAL_CODE};
use crate::models::{LoginRecord, NewUser, Profile};

/// Raw row for login lookups.
#[derive(sqlx::FromRow)]
struct LoginRow {
    user_id: UserId,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer and their first address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<UserId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let taken: Option<UserId> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1")
                .bind(user.email.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        if taken.is_some() {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        // The unique index still guards against a concurrent signup.
        let user_id: UserId = sqlx::query_scalar(
            r"
            INSERT INTO users (username, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id
            ",
        )
        .bind(user.email.username())
        .bind(user.email.as_str())
        .bind(user.password.expose_secret())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(UserRole::Customer.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?;

        insert_default_address(&mut tx, user_id, &user.street).await?;

        tx.commit().await?;
        Ok(user_id)
    }

    /// Get the login record for an email address (exact match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_login(&self, email: &Email) -> Result<Option<LoginRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, LoginRow>(
            r"
            SELECT user_id, email, first_name, last_name, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| LoginRecord {
            user_id: r.user_id,
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
            password: SecretString::from(r.password_hash),
        }))
    }

    /// Get the profile header, joined to the user's first address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r"
            SELECT u.first_name, u.last_name, u.email, a.street AS address
            FROM users u
            LEFT JOIN LATERAL (
                SELECT street FROM address
                WHERE address.user_id = u.user_id
                ORDER BY address_id
                LIMIT 1
            ) a ON TRUE
            WHERE u.user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Replace the street of the user's first address, or add an address
    /// with default city/postal code/country when the user has none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_address(&self, user_id: UserId, street: &str) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<UserId> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let updated = sqlx::query(
            r"
            UPDATE address SET street = $1
            WHERE address_id = (
                SELECT address_id FROM address
                WHERE user_id = $2
                ORDER BY address_id
                LIMIT 1
            )
            ",
        )
        .bind(street)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            insert_default_address(&mut tx, user_id, street).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Create a user with an explicit role (operator tooling).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create_with_role(
        &self,
        email: &Email,
        password: &SecretString,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> Result<UserId, RepositoryError> {
        let user_id = sqlx::query_scalar(
            r"
            INSERT INTO users (username, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id
            ",
        )
        .bind(email.username())
        .bind(email.as_str())
        .bind(password.expose_secret())
        .bind(first_name)
        .bind(last_name)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?;

        Ok(user_id)
    }
}

async fn insert_default_address(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: UserId,
    street: &str,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO address (street, city, postal_code, country, user_id)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(street)
    .bind(DEFAULT_CITY)
    .bind(DEFAULT_POSTAL_CODE)
    .bind(DEFAULT_COUNTRY)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
