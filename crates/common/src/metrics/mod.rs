//! Metrics and observability utilities
//!
//! Prometheus-style metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Biospace metrics
pub const METRICS_PREFIX: &str = "biospace";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 10ms, P99 < 250ms on a few thousand documents
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms - P50 target
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms - P99 target
    0.500,  // 500ms
    1.000,  // 1s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Search metrics
    describe_counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of search queries"
    );

    describe_histogram!(
        format!("{}_search_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Search latency in seconds"
    );

    describe_gauge!(
        format!("{}_search_results_count", METRICS_PREFIX),
        Unit::Count,
        "Number of results returned from the last search"
    );

    // Graph metrics
    describe_histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Provenance graph build latency in seconds"
    );

    describe_gauge!(
        format!("{}_graph_nodes", METRICS_PREFIX),
        Unit::Count,
        "Nodes in the last returned graph"
    );

    describe_gauge!(
        format!("{}_graph_edges", METRICS_PREFIX),
        Unit::Count,
        "Edges in the last returned graph"
    );

    // Comparison metrics
    describe_counter!(
        format!("{}_comparisons_total", METRICS_PREFIX),
        Unit::Count,
        "Total comparison requests"
    );

    // Corpus metrics
    describe_counter!(
        format!("{}_corpus_reloads_total", METRICS_PREFIX),
        Unit::Count,
        "Total corpus reload attempts"
    );

    describe_gauge!(
        format!("{}_corpus_documents", METRICS_PREFIX),
        Unit::Count,
        "Documents in the installed corpus snapshot"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Helper to record search metrics
pub fn record_search(duration_secs: f64, result_count: usize, answered: bool) {
    counter!(
        format!("{}_search_queries_total", METRICS_PREFIX),
        "answered" => answered.to_string()
    )
    .increment(1);

    histogram!(format!("{}_search_duration_seconds", METRICS_PREFIX)).record(duration_secs);

    gauge!(format!("{}_search_results_count", METRICS_PREFIX)).set(result_count as f64);
}

/// Helper to record graph metrics
pub fn record_graph(duration_secs: f64, nodes: usize, edges: usize) {
    histogram!(format!("{}_graph_build_duration_seconds", METRICS_PREFIX)).record(duration_secs);
    gauge!(format!("{}_graph_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_graph_edges", METRICS_PREFIX)).set(edges as f64);
}

/// Helper to record comparison metrics
pub fn record_comparison(resolved: usize, success: bool) {
    let status = if success { "success" } else { "insufficient" };

    counter!(
        format!("{}_comparisons_total", METRICS_PREFIX),
        "status" => status.to_string(),
        "resolved" => resolved.min(10).to_string()
    )
    .increment(1);
}

/// Helper to record corpus reload metrics
pub fn record_reload(documents: usize, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_corpus_reloads_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);

    if success {
        gauge!(format!("{}_corpus_documents", METRICS_PREFIX)).set(documents as f64);
    }
}
