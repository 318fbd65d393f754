// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of API requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // EDIT METRICS
    // ============================================================================

    /// Edit calls to the Gemini image model by outcome
    pub static ref EDIT_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("edit_requests_total", "Total image edit calls"),
        &["model", "outcome"], // outcome: success, transport_error, no_content, ...
        REGISTRY
    ).unwrap();

    /// Edit call duration
    pub static ref EDIT_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("edit_duration_seconds", "Image edit call duration")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        &["model"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // UPLOAD METRICS
    // ============================================================================

    /// Image uploads by validation outcome
    pub static ref UPLOADS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("uploads_total", "Total image uploads"),
        &["outcome"], // outcome: accepted, invalid_type, too_large
        REGISTRY
    ).unwrap();

    /// Session state changes
    pub static ref SESSION_TRANSITIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("session_transitions_total", "Total edit session transitions"),
        &["to"], // to: idle, has_image, processing, errored
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
