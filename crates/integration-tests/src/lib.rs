//! Integration tests for Folkmint.
//!
//! These run against a live storefront, normally one backed by `PostgreSQL`
//! and seeded with `fm-cli seed`.
//!
//! # Running Tests
//!
//! ```bash
//! fm-cli seed
//! cargo run -p folkmint-storefront &
//! STOREFRONT_URL=http://127.0.0.1:8000 cargo test -p folkmint-integration-tests -- --ignored
//! ```

use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

/// Default base URL when `STOREFRONT_URL` is unset.
pub const DEFAULT_STOREFRONT_URL: &str = "http://127.0.0.1:8000";

/// Shared HTTP client and base URL for one test.
pub struct TestContext {
    pub client: Client,
    pub storefront_url: String,
}

impl TestContext {
    /// Build a context from `STOREFRONT_URL`.
    #[must_use]
    pub fn new() -> Self {
        let storefront_url = std::env::var("STOREFRONT_URL")
            .unwrap_or_else(|_| DEFAULT_STOREFRONT_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        Self {
            client: Client::new(),
            storefront_url,
        }
    }

    /// Absolute URL for an API path such as `/api/products`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// `GET` a path.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the server is unreachable.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(path)).send().await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the server is unreachable.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> reqwest::Result<Response> {
        self.client.post(self.url(path)).json(body).send().await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the server is unreachable.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> reqwest::Result<Response> {
        self.client.put(self.url(path)).json(body).send().await
    }

    /// Sign up a fresh customer and log in, returning the user ID.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the server is unreachable.
    pub async fn fresh_customer(&self) -> reqwest::Result<(String, i64)> {
        let email = unique_email();
        self.post(
            "/api/auth/signup",
            &serde_json::json!({
                "firstName": "Test",
                "lastName": "Shopper",
                "email": email,
                "password": "pw-123",
                "address": "1 Test Road",
            }),
        )
        .await?
        .error_for_status()?;

        let login: Value = self
            .post(
                "/api/auth/login",
                &serde_json::json!({ "email": email, "password": "pw-123" }),
            )
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok((email, login["user_id"].as_i64().unwrap_or_default()))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// An email address no earlier run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@folkmint.test", uuid::Uuid::new_v4().simple())
}
