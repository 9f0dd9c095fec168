//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mirror_race_total` (counter): resolved requests by outcome
//! - `mirror_race_duration_seconds` (histogram): time to resolve a request
//! - `mirror_probe_total` (counter): finished probes by result
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record how a request was resolved.
pub fn record_resolution(outcome: &'static str, start: Instant) {
    counter!("mirror_race_total", "outcome" => outcome).increment(1);
    histogram!("mirror_race_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished probe.
pub fn record_probe(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("mirror_probe_total", "result" => result).increment(1);
}
