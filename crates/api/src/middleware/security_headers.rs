//! Security response headers.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

const BASE_HEADERS: [(&str, &str); 3] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
];

/// Adds browser hardening headers to every response.
///
/// `Strict-Transport-Security` is only sent when
/// `BARSHIFT__SECURITY__HSTS_ENABLED=true`, since it must stay off until
/// HTTPS termination is in place.
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in BASE_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if hsts_enabled() {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

fn hsts_enabled() -> bool {
    std::env::var("BARSHIFT__SECURITY__HSTS_ENABLED")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_header_values_are_valid() {
        for (name, value) in BASE_HEADERS {
            // HeaderName::from_static panics on uppercase names
            assert_eq!(name, name.to_lowercase());
            assert!(HeaderValue::from_static(value).to_str().is_ok());
        }
    }

    #[test]
    fn test_hsts_disabled_by_default() {
        assert!(!hsts_enabled());
    }
}
