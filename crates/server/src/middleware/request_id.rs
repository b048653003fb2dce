//! Request ID middleware for request tracing and correlation.
//!
//! An upstream `x-request-id` is reused when it looks like an identifier;
//! anything else is replaced with a fresh UUID v4. The ID is recorded on the
//! `http_request` span, tagged on the Sentry scope, and echoed back.

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

const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Pick the request ID for `headers`.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_UPSTREAM_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned)
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let id = request_id(request.headers());

    Span::current().record("request_id", id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
