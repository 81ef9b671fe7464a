//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health                          - Liveness
//! GET    /api/health/ready                    - Readiness (store ping)
//!
//! # Auth
//! POST   /api/auth/signup                     - Create account
//! POST   /api/auth/login                      - Check credentials
//!
//! # Catalog
//! GET    /api/categories                      - All categories
//! GET    /api/products?category_id=           - Products with variants
//! GET    /api/products/{id}/reviews           - Reviews of a product
//! POST   /api/reviews?user_id=                - Write a review
//!
//! # Account
//! GET    /api/user/profile/{id}               - Profile and order history
//! PUT    /api/user/profile/{id}/address       - Replace street address
//! POST   /api/user/preference/view/{id}?user_id= - Count a product view
//!
//! # Cart
//! GET    /api/cart/{user_id}                  - Cart lines
//! POST   /api/cart/add?user_id=               - Add a variant
//! PUT    /api/cart/item/{id}?quantity=        - Set line quantity
//! DELETE /api/cart/item/{id}                  - Remove line
//!
//! # Checkout
//! POST   /api/checkout?user_id=               - Place order
//!
//! # Static
//! GET    /images/*                            - Product images
//! ```
//!
//! There are no sessions: the acting user is passed as `user_id` in the path
//! or query string.

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod preferences;
pub mod products;
pub mod reviews;

use axum::{
    Router,
    extract::Request,
    middleware::from_fn,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};

use folkmint_core::UserId;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// `?user_id=` naming the acting user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: UserId,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

/// Create the user (profile and preference) routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/{user_id}", get(account::profile))
        .route("/profile/{user_id}/address", put(account::update_address))
        .route("/preference/view/{product_id}", post(preferences::track_view))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route(
            "/item/{item_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/{user_id}", get(cart::show))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .route("/categories", get(products::categories))
        .route("/products", get(products::index))
        .route("/products/{product_id}/reviews", get(reviews::index))
        .route("/reviews", post(reviews::create))
        .nest("/user", user_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout))
}

/// Build the complete application: API, images and the shared layers.
///
/// Sentry layers are added by the binary so tests run without a client.
pub fn app(state: AppState) -> Router {
    let images = ServeDir::new(&state.config().images_dir);
    let cors = cors_layer(&state.config().cors_origins);

    Router::new()
        .nest("/api", api_routes())
        .nest_service("/images", images)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}
