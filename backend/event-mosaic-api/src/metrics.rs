//! Service-level Prometheus metrics
//!
//! Registered in the default registry, so `/metrics` exposes them next to the
//! HTTP metrics of the middleware.

use prometheus::{HistogramVec, IntCounterVec};
use std::time::Instant;

lazy_static::lazy_static! {
    pub static ref ES_QUERY_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "em_api_es_query_duration_seconds",
        "Elasticsearch query latency",
        &["operation", "outcome"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).expect("em_api_es_query_duration_seconds registers once");

    pub static ref MAP_FEATURES_RETURNED: HistogramVec = prometheus::register_histogram_vec!(
        "em_api_map_features_returned",
        "Features per map response",
        &["mode"],
        vec![0.0, 1.0, 10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    ).expect("em_api_map_features_returned registers once");

    pub static ref MAP_BACKEND_FAILURES_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "em_api_map_backend_failures_total",
        "Map requests answered with an empty collection after a backend failure",
        &["mode"]
    ).expect("em_api_map_backend_failures_total registers once");
}

pub fn observe_es_query(operation: &str, started: Instant, success: bool) {
    let outcome = if success { "success" } else { "error" };
    ES_QUERY_DURATION_SECONDS
        .with_label_values(&[operation, outcome])
        .observe(started.elapsed().as_secs_f64());
}

pub fn observe_map_features(mode: &str, count: usize) {
    MAP_FEATURES_RETURNED
        .with_label_values(&[mode])
        .observe(count as f64);
}

pub fn record_map_backend_failure(mode: &str) {
    MAP_BACKEND_FAILURES_TOTAL.with_label_values(&[mode]).inc();
}
