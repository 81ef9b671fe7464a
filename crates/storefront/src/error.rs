//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Error bodies are `{"detail": "<message>"}`, the shape storefront clients read.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store read failed. Details are logged, not returned.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Store write failed and was rolled back. The cause is returned.
    #[error("Database error: {}", store_detail(.0))]
    Transaction(RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request conflicts with existing data (e.g. duplicate email).
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Classify a failure from a store write.
    ///
    /// Conflicts and missing rows keep their client status; anything else
    /// becomes a `Transaction` error.
    #[must_use]
    pub fn write(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::NotFound => Self::NotFound("Not found".to_owned()),
            other => Self::Transaction(other),
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Transaction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Innermost message of a repository error.
fn store_detail(err: &RepositoryError) -> String {
    match err {
        RepositoryError::Database(e) => e.to_string(),
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Transaction(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Read failures stay opaque
        let message = match self {
            Self::Database(_) => "Internal server error".to_owned(),
            Self::Transaction(ref err) => format!("Database error: {}", store_detail(err)),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg) => msg,
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("variant_id", "101")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn detail(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json["detail"].as_str().unwrap().to_owned())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Conflict("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Transaction(RepositoryError::NotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_client_errors_return_message_as_detail() {
        let (status, message) =
            detail(AppError::Conflict("Email already registered".to_owned())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Email already registered");
    }

    #[tokio::test]
    async fn test_read_failures_are_opaque() {
        let err = AppError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let (status, message) = detail(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }

    #[tokio::test]
    async fn test_write_failures_carry_cause() {
        let err = AppError::write(RepositoryError::InvalidReference("variant 999".to_owned()));
        let (status, message) = detail(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Database error: invalid reference: variant 999");
    }

    #[test]
    fn test_write_keeps_client_statuses() {
        assert!(matches!(
            AppError::write(RepositoryError::Conflict("email".to_owned())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::write(RepositoryError::NotFound),
            AppError::NotFound(_)
        ));
    }
}
