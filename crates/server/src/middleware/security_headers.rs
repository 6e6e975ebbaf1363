//! Security headers middleware.
//!
//! Pages are server-rendered HTML with no scripts, inline styles or
//! third-party assets, so the policy allows only same-origin stylesheets and
//! same-origin form posts.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

const CSP: &str = "default-src 'none'; \
                   style-src 'self'; \
                   img-src 'self'; \
                   form-action 'self'; \
                   base-uri 'self'; \
                   frame-ancestors 'none'";

/// Add security headers to all responses.
///
/// `Cache-Control: no-store` keeps dashboards and complaint pages out of
/// shared caches.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(CSP));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));

    response
}
