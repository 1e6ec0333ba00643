// security headers middleware

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Response},
    middleware::Next,
};

/// add security headers to all responses
pub async fn add_security_headers(request: Request, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // prevent framing to avoid clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    // prevent mime type sniffing
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );

    // listings reveal bucket layout, keep them out of referrers
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));

    // pages only ever load their own stylesheet and icon
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'none'; style-src 'self'; img-src 'self'; base-uri 'none'; form-action 'none'",
        ),
    );

    response
}
