//! Router tests over the in-memory store.
//!
//! Each test builds a fresh seeded store, so tests are independent.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use folkmint_storefront::config::{DatabaseConfig, StorefrontConfig};
use folkmint_storefront::db::MockStore;
use folkmint_storefront::middleware::REQUEST_ID_HEADER;
use folkmint_storefront::routes;
use folkmint_storefront::state::AppState;

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database: DatabaseConfig {
            url: None,
            host: "localhost".to_owned(),
            port: 5432,
            user: "postgres".to_owned(),
            password: SecretString::from(""),
            name: "ecommerce".to_owned(),
            pool_size: 5,
            acquire_timeout: Duration::from_secs(10),
        },
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 8000,
        public_url: "http://localhost:8000".to_owned(),
        images_dir: std::env::temp_dir(),
        cors_origins: vec!["http://localhost:5173".to_owned()],
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn app() -> Router {
    let config = test_config();
    let store = Arc::new(MockStore::seeded(&config.images_url()));
    routes::app(AppState::new(config, store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn signup_body(email: &str, password: &str) -> Value {
    json!({
        "firstName": "A",
        "lastName": "B",
        "email": email,
        "password": password,
        "address": "X"
    })
}

fn checkout_body(items: Value) -> Value {
    json!({
        "items": items,
        "payment_method": {"card_last4": "4242", "type": "visa", "expiry_date": "2027-12-31"}
    })
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_signup_then_login_returns_same_user() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        Some(signup_body("a@x.com", "pw")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["message"], "User created successfully");

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "a@x.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user_id"], created["user_id"]);
    assert_eq!(login["username"], "A B");
    assert_eq!(login["email"], "a@x.com");
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        Some(signup_body("demo@folkmint.com", "other")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");

    // The first signup's password still works.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "demo@folkmint.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_rejects_malformed_email() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/auth/signup",
        Some(signup_body("not-an-email", "pw")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid email"));
}

#[tokio::test]
async fn test_login_requires_exact_password() {
    let app = app();

    for (email, password) in [
        ("demo@folkmint.com", "Password123"),
        ("demo@folkmint.com", ""),
        ("nobody@folkmint.com", "password123"),
        ("garbage", "password123"),
    ] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({"email": email, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{email}/{password}");
        assert_eq!(body["detail"], "Invalid email or password");
    }
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "demo@folkmint.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

// =============================================================================
// Catalog and reviews
// =============================================================================

#[tokio::test]
async fn test_categories_and_products() {
    let app = app();

    let (status, categories) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories.as_array().unwrap().len(), 4);

    let (status, products) = send(&app, Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = &products[0];
    assert_eq!(first["name"], "Nakshi Kantha");
    assert_eq!(first["base_price"], 12000.0);
    assert_eq!(
        first["main_image"],
        "http://localhost:8000/images/1_lRUm2IW.webp"
    );
    assert_eq!(first["variants"][0]["variant_id"], 101);
}

#[tokio::test]
async fn test_products_filtered_by_category() {
    let (status, products) = send(&app(), Method::GET, "/api/products?category_id=1", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["product_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [1, 3]);
}

#[tokio::test]
async fn test_review_is_listed_with_author() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/reviews?user_id=1",
        Some(json!({"rating": 5, "comment": "Lovely stitching", "product_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["message"], "Review submitted successfully");

    let (_, reviews) = send(&app, Method::GET, "/api/products/1/reviews", None).await;
    assert_eq!(reviews[0]["review_id"], created["review_id"]);
    assert_eq!(reviews[0]["username"], "demouser");
    assert_eq!(reviews[0]["first_name"], "Demo");
}

// =============================================================================
// Account
// =============================================================================

#[tokio::test]
async fn test_profile_of_unknown_user_is_not_found() {
    let (status, body) = send(&app(), Method::GET, "/api/user/profile/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "User not found"}));
}

#[tokio::test]
async fn test_demo_profile_with_orders() {
    let (status, body) = send(&app(), Method::GET, "/api/user/profile/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["email"], "demo@folkmint.com");
    assert_eq!(
        body["profile"]["address"],
        "123 Artisans Lane, Dhaka, Bangladesh"
    );
    assert_eq!(body["orders"][0]["order_id"], 1002);
    assert_eq!(body["orders"][1]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_address() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/user/profile/1/address",
        Some(json!({"address": "7 Potters Row"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Address updated successfully");

    let (_, profile) = send(&app, Method::GET, "/api/user/profile/1", None).await;
    assert_eq!(profile["profile"]["address"], "7 Potters Row");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/user/profile/999/address",
        Some(json!({"address": "Nowhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_track_view() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/api/user/preference/view/2?user_id=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "updated"}));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_add_accumulates_on_one_line() {
    let app = app();

    for quantity in [2, 3] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/cart/add?user_id=1",
            Some(json!({"variant_id": 101, "quantity": quantity})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item added to cart");
    }

    let (status, cart) = send(&app, Method::GET, "/api/cart/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["variant_id"], 101);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(items[0]["price"], 12000.0);
}

#[tokio::test]
async fn test_cart_update_and_remove_item() {
    let app = app();

    send(
        &app,
        Method::POST,
        "/api/cart/add?user_id=1",
        Some(json!({"variant_id": 201, "quantity": 1})),
    )
    .await;
    let (_, cart) = send(&app, Method::GET, "/api/cart/1", None).await;
    let item_id = cart["items"][0]["cart_item_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/cart/item/{item_id}?quantity=4"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Quantity updated");

    let (_, cart) = send(&app, Method::GET, "/api/cart/1", None).await;
    assert_eq!(cart["items"][0]["quantity"], 4);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/cart/item/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed from cart");

    let (_, cart) = send(&app, Method::GET, "/api/cart/1", None).await;
    assert_eq!(cart, json!({"items": []}));
}

#[tokio::test]
async fn test_cart_quantity_overflow_returns_error_body() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/cart/add?user_id=1",
        Some(json!({"variant_id": 101, "quantity": 2_147_483_647})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/cart/add?user_id=1",
        Some(json!({"variant_id": 101, "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Database error: out of range")
    );

    let (_, cart) = send(&app, Method::GET, "/api/cart/1", None).await;
    assert_eq!(cart["items"][0]["quantity"], 2_147_483_647);
}

#[tokio::test]
async fn test_cart_rejects_non_numeric_user() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/api/cart/add?user_id=abc",
        Some(json!({"variant_id": 101, "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_records_order() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout?user_id=1",
        Some(checkout_body(
            json!([{"variant_id": 101, "quantity": 1, "price": 12000.0}]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order placed successfully");

    let (_, profile) = send(&app, Method::GET, "/api/user/profile/1", None).await;
    let order = &profile["orders"][0];
    assert_eq!(order["order_id"], body["order_id"]);
    assert_eq!(order["total_amount"], 12000.0);
    assert_eq!(order["status"], "Processing");
    assert_eq!(order["items"].as_array().unwrap().len(), 1);
    assert_eq!(order["items"][0]["product_id"], 1);
}

#[tokio::test]
async fn test_checkout_total_uses_submitted_prices() {
    let app = app();

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/checkout?user_id=1",
        Some(checkout_body(json!([
            {"variant_id": 101, "quantity": 2, "price": 100.5},
            {"variant_id": 401, "quantity": 1, "price": 3000.0}
        ]))),
    )
    .await;

    let (_, profile) = send(&app, Method::GET, "/api/user/profile/1", None).await;
    assert_eq!(profile["orders"][0]["order_id"], body["order_id"]);
    assert_eq!(profile["orders"][0]["total_amount"], 3201.0);
}

#[tokio::test]
async fn test_checkout_failure_leaves_no_order() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout?user_id=1",
        Some(checkout_body(json!([
            {"variant_id": 101, "quantity": 1, "price": 12000.0},
            {"variant_id": 999, "quantity": 1, "price": 1.0}
        ]))),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Database error:")
    );

    let (_, profile) = send(&app, Method::GET, "/api/user/profile/1", None).await;
    assert_eq!(profile["orders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_checkout_with_oversized_amount_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout?user_id=1",
        Some(checkout_body(
            json!([{"variant_id": 101, "quantity": 1000, "price": 1.0e26}]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("variant 101"));

    let (_, profile) = send(&app, Method::GET, "/api/user/profile/1", None).await;
    assert_eq!(profile["orders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_checkout_total_too_large_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout?user_id=1",
        Some(checkout_body(json!([
            {"variant_id": 101, "quantity": 2147483647, "price": 99999}
        ]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "order total exceeds the maximum amount");
}

#[tokio::test]
async fn test_checkout_sub_cent_price_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/checkout?user_id=1",
        Some(checkout_body(
            json!([{"variant_id": 101, "quantity": 3, "price": 0.005}]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("at most 2 decimal places")
    );

    let (_, profile) = send(&app, Method::GET, "/api/user/profile/1", None).await;
    assert_eq!(profile["orders"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Health and plumbing
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));

    let (status, body) = send(&app, Method::GET, "/api/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ready", "store": "mock"}));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/api/health")
        .header(REQUEST_ID_HEADER, "trace-42")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "trace-42"
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/cart/add?user_id=1")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
}
