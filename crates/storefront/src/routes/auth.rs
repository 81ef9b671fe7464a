//! Signup and login.
//!
//! Credentials are stored and compared as given; there is no hashing and no
//! session or token is issued. Clients keep the returned `user_id`.

use axum::{Json, extract::State};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use folkmint_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::ApiJson;
use crate::models::NewUser;
use crate::state::AppState;

/// Signup form as sent by the storefront client.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Street line of the first address.
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: UserId,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Display name: first and last name joined by a space.
    pub username: String,
}

/// Create an account.
///
/// POST /api/auth/signup
///
/// # Errors
///
/// 400 for a malformed email or an email that is already registered.
#[instrument(skip(state, body))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?;

    let user = NewUser {
        first_name: body.first_name,
        last_name: body.last_name,
        email,
        password: SecretString::from(body.password),
        street: body.address,
    };

    let user_id = state
        .store()
        .create_user(&user)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => {
                AppError::Conflict("Email already registered".to_owned())
            }
            other => AppError::write(other),
        })?;

    tracing::info!(%user_id, "Account created");

    Ok(Json(SignupResponse {
        message: "User created successfully",
        user_id,
    }))
}

/// Check credentials and return the account header.
///
/// POST /api/auth/login
///
/// # Errors
///
/// 401 when the email is unknown or the password does not match.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_owned());

    // A malformed address cannot belong to an account.
    let email = Email::parse(&body.email).map_err(|_| invalid())?;

    let record = state
        .store()
        .find_login(&email)
        .await?
        .ok_or_else(invalid)?;

    if record.password.expose_secret() != body.password {
        tracing::info!(user_id = %record.user_id, "Login rejected");
        return Err(invalid());
    }

    set_sentry_user(&record.user_id, Some(&record.email));

    Ok(Json(LoginResponse {
        user_id: record.user_id,
        username: record.display_name(),
        email: record.email,
        first_name: record.first_name,
        last_name: record.last_name,
    }))
}
