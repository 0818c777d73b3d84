//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method and status
//! - `relay_request_duration_seconds` (histogram): end-to-end relay latency
//!
//! The Prometheus exporter runs on its own listener so scrapes never pass
//! through the relay route table.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed relay.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("relay_request_duration_seconds").record(start_time.elapsed().as_secs_f64());
}
