//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (feed fetches, relay traffic, page renders)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `overtime_feed_fetch_total` (counter): feed fetches by outcome
//! - `overtime_feed_fetch_duration_seconds` (histogram): feed latency
//! - `overtime_relay_requests_total` (counter): relay responses by status
//! - `overtime_relay_duration_seconds` (histogram): time to upstream headers
//! - `overtime_page_requests_total` (counter): page/API renders by page, status
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so tests need no setup

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one feed fetch attempt.
pub fn record_feed_fetch(outcome: &'static str, start: Instant) {
    counter!("overtime_feed_fetch_total", "outcome" => outcome).increment(1);
    histogram!("overtime_feed_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one relay response.
pub fn record_relay_request(status: u16, start: Instant) {
    counter!("overtime_relay_requests_total", "status" => status.to_string()).increment(1);
    histogram!("overtime_relay_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one page or API render.
pub fn record_page_request(page: &'static str, status: u16) {
    counter!(
        "overtime_page_requests_total",
        "page" => page,
        "status" => status.to_string()
    )
    .increment(1);
}
