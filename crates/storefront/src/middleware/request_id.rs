//! Request ID middleware for request tracing and correlation.
//!
//! Reuses the `x-request-id` sent by the client or a proxy when it looks sane,
//! otherwise generates a UUID v4. The ID is recorded in the request span and
//! the Sentry scope, and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest incoming ID that is reused as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The caller's request ID, if it is printable ASCII of reasonable length.
fn incoming_request_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();

    let usable = !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());

    usable.then(|| id.to_owned())
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        incoming_request_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        headers
    }

    #[test]
    fn test_reuses_upstream_id() {
        assert_eq!(
            incoming_request_id(&headers("cf-8a1b2c")).as_deref(),
            Some("cf-8a1b2c")
        );
    }

    #[test]
    fn test_rejects_blank_or_oversized_id() {
        assert_eq!(incoming_request_id(&HeaderMap::new()), None);
        assert_eq!(incoming_request_id(&headers("   ")), None);
        assert_eq!(incoming_request_id(&headers(&"a".repeat(200))), None);
        assert_eq!(incoming_request_id(&headers("has space")), None);
    }
}
