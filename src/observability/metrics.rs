//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_requests_total` (counter): requests by outcome (`redirect`, `miss`)
//! - `redirect_request_duration_seconds` (histogram): lookup + response latency
//! - `redirect_rules_loaded` (gauge): rules in the active set
//! - `redirect_rule_replacements_total` (counter): replacements by result
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Prometheus exporter runs its own HTTP listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record a handled front request.
pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("redirect_requests_total", "outcome" => outcome).increment(1);
    histogram!("redirect_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn set_rules_loaded(count: usize) {
    gauge!("redirect_rules_loaded").set(count as f64);
}

pub fn record_replacement(result: &'static str) {
    counter!("redirect_rule_replacements_total", "result" => result).increment(1);
}
