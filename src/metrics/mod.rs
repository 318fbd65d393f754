// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, EDIT_DURATION, EDIT_REQUESTS, REQUESTS_TOTAL, SESSION_TRANSITIONS, UPLOADS,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16) {
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status_code.to_string()])
        .inc();
}

/// Helper to record an edit call and its outcome
pub fn record_edit(model: &str, outcome: &str, duration_secs: f64) {
    EDIT_REQUESTS.with_label_values(&[model, outcome]).inc();
    EDIT_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record upload validation outcomes
pub fn record_upload(outcome: &str) {
    UPLOADS.with_label_values(&[outcome]).inc();
}

pub fn record_transition(to: &str) {
    SESSION_TRANSITIONS.with_label_values(&[to]).inc();
}
