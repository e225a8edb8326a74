//! Request ID middleware for log correlation.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Attaches a request ID to every request.
///
/// An inbound `x-request-id` header is reused so IDs survive proxies;
/// otherwise a fresh UUID is generated. The ID is stored in the request
/// extensions, spans every log line produced while handling the request,
/// and is echoed in the response headers.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let start = std::time::Instant::now();
    let mut response = async { next.run(req).await }.instrument(span).await;

    tracing::info!(
        request_id = %request_id,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_struct() {
        let id = RequestId("abc-123".to_string());
        assert_eq!(id.0, "abc-123");
    }

    #[test]
    fn test_header_name_is_lowercase() {
        // HeaderName::from_static panics on uppercase names
        assert_eq!(REQUEST_ID_HEADER, REQUEST_ID_HEADER.to_lowercase());
    }
}
