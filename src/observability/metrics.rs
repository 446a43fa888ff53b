//! Metrics collection and exposition.
//!
//! # Metrics
//! - `scanner_requests_total` (counter): API requests by endpoint, status
//! - `scanner_request_duration_seconds` (histogram): API latency by endpoint
//! - `scanner_chain_scans_total` (counter): per-chain scans by outcome
//! - `scanner_tokens_found` (histogram): tokens reported per chain scan
//! - `scanner_spam_filtered_total` (counter): spam tokens dropped per chain
//! - `scanner_provider_calls_total` (counter): outbound calls by kind, outcome

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics listener started");
    Ok(())
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "scanner_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("scanner_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// `outcome` is `ok`, `error`, `timeout` or `panic`.
pub fn record_chain_scan(chain: &str, outcome: &'static str, found: usize) {
    ::metrics::counter!(
        "scanner_chain_scans_total",
        "chain" => chain.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("scanner_tokens_found", "chain" => chain.to_string()).record(found as f64);
}

pub fn record_spam_filtered(chain: &str) {
    ::metrics::counter!("scanner_spam_filtered_total", "chain" => chain.to_string()).increment(1);
}

pub fn record_provider_call(kind: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!(
        "scanner_provider_calls_total",
        "kind" => kind,
        "outcome" => outcome
    )
    .increment(1);
    tracing::trace!(kind, outcome, elapsed_ms = start.elapsed().as_millis() as u64, "Provider call finished");
}
