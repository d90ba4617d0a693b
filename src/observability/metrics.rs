//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_dispatch_total` (counter): dispatches by outcome and method
//! - `route_dispatch_duration_seconds` (histogram): time spent resolving a path

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatch.
pub fn record_dispatch(outcome: &'static str, method: &Method, start: Instant) {
    ::metrics::counter!(
        "route_dispatch_total",
        "outcome" => outcome,
        "method" => method_label(method)
    )
    .increment(1);
    ::metrics::histogram!("route_dispatch_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

static STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::TRACE,
    Method::CONNECT,
];

/// Metric label for a request method. Extension methods share one label.
fn method_label(method: &Method) -> &'static str {
    STANDARD_METHODS
        .iter()
        .find(|m| *m == method)
        .map_or("other", Method::as_str)
}
