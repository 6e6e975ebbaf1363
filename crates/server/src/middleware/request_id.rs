//! Request ID middleware for request tracing and correlation.
//!
//! An `x-request-id` from an upstream proxy is reused if it is short and
//! printable; otherwise a UUID v4 is generated.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_INCOMING_ID_LENGTH: usize = 128;

fn incoming_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let value = value.trim();
    (!value.is_empty() && value.len() <= MAX_INCOMING_ID_LENGTH).then(|| value.to_owned())
}

/// Middleware that ensures every request has a unique request ID.
///
/// The ID is recorded on the `http_request` span, set as a Sentry tag and
/// returned in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);

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
    use axum::{Router, body::Body, http, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_generates_id_when_missing() {
        let request = http::Request::builder()
            .uri("/")
            .body(Body::empty())
            .expect("valid request");
        let response = app().oneshot(request).await.expect("infallible");

        let id = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .expect("ascii header");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_reuses_upstream_id() {
        let request = http::Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "edge-42")
            .body(Body::empty())
            .expect("valid request");
        let response = app().oneshot(request).await.expect("infallible");

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "edge-42");
    }
}
