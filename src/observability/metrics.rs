//! Metrics collection and exposition.
//!
//! # Metrics
//! - `navproxy_requests_total` (counter): requests by route, status
//! - `navproxy_request_duration_seconds` (histogram): latency by route
//! - `navproxy_upstream_fetches_total` (counter): fetches by content kind, outcome
//! - `navproxy_rewritten_links_total` (counter): references turned into gateway links
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", "navproxy")
        .install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("navproxy_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    histogram!("navproxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_fetch(kind: &'static str, outcome: &'static str) {
    counter!("navproxy_upstream_fetches_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub fn record_rewritten_links(count: usize) {
    counter!("navproxy_rewritten_links_total").increment(count as u64);
}
