//! Metrics collection and exposition.
//!
//! # Metrics
//! - `siteaccess_matches_total` (counter): resolutions by siteaccess, matching type
//! - `siteaccess_pipeline_terminal_total` (counter): terminal responses by stage
//! - `siteaccess_requests_total` (counter): requests by method, status
//! - `siteaccess_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Prometheus exporter with its own HTTP listener
//! - Recording functions are plain calls usable before initialization

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::observability::ObservabilityError;

pub const MATCHES_TOTAL: &str = "siteaccess_matches_total";
pub const PIPELINE_TERMINAL_TOTAL: &str = "siteaccess_pipeline_terminal_total";
pub const REQUESTS_TOTAL: &str = "siteaccess_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "siteaccess_request_duration_seconds";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: &str) -> Result<(), ObservabilityError> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| ObservabilityError::InvalidAddress(format!("{addr}: {e}")))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ObservabilityError::MetricsInit(e.to_string()))?;

    describe_metrics();
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(MATCHES_TOTAL, "Siteaccess resolutions by siteaccess and matcher");
    describe_counter!(
        PIPELINE_TERMINAL_TOTAL,
        "Requests answered by a pipeline stage"
    );
    describe_counter!(REQUESTS_TOTAL, "HTTP requests processed");
    describe_histogram!(REQUEST_DURATION_SECONDS, "HTTP request duration in seconds");
}

/// One siteaccess resolution.
pub fn record_siteaccess_match(siteaccess: &str, matching_type: &'static str) {
    counter!(
        MATCHES_TOTAL,
        "siteaccess" => siteaccess.to_string(),
        "matching_type" => matching_type
    )
    .increment(1);
}

/// A pipeline stage produced the response.
pub fn record_terminal_stage(stage: &'static str) {
    counter!(PIPELINE_TERMINAL_TOTAL, "stage" => stage).increment(1);
}

/// A completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
