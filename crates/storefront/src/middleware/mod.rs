//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (new hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (configured browser origins)
//!
//! Request extractors that share the error body live in [`extract`].

pub mod cors;
pub mod extract;
pub mod request_id;

pub use cors::cors_layer;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
