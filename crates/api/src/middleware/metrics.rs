//! Prometheus metrics collection and export.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS_HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Records request metrics around every handler.
///
/// - `http_requests_total` counter (method, path, status)
/// - `http_request_duration_seconds` histogram (method, path)
/// - `http_requests_in_flight` gauge
///
/// Paths are the matched route patterns, not raw URIs, so path parameters
/// do not explode label cardinality.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_label(req.method());
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    gauge!("http_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_in_flight").decrement(1.0);

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Method name for metric labels. Uncommon methods collapse into one
/// label to bound cardinality.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

/// Record a registration admitted to a shift.
pub fn record_registration_admitted() {
    counter!("registrations_admitted_total").increment(1);
}

/// Record reminder emails delivered in one dispatch batch.
pub fn record_reminders_sent(lead_days: i64, count: usize) {
    counter!(
        "reminders_sent_total",
        "lead_days" => lead_days.to_string()
    )
    .increment(count as u64);
}

/// Handler for the /metrics endpoint, Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        (
            axum::http::StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
    } else {
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            [(axum::http::header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        )
    }
}

/// Installs the global Prometheus recorder.
///
/// Must run once at startup, before any metric is recorded. Tests skip it;
/// the metrics macros fall back to a no-op recorder.
pub fn init_metrics() {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .set_buckets(&[
            0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0,
        ])
        .expect("Failed to set histogram buckets")
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    if PROMETHEUS_HANDLE.set(handle).is_err() {
        panic!("Prometheus handle already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_known_methods() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::POST), "POST");
        assert_eq!(method_label(&Method::PATCH), "PATCH");
        assert_eq!(method_label(&Method::DELETE), "DELETE");
    }

    #[test]
    fn test_method_label_pools_uncommon_methods() {
        assert_eq!(method_label(&Method::TRACE), "OTHER");
        assert_eq!(method_label(&Method::CONNECT), "OTHER");
    }
}
