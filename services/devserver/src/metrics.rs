//! Prometheus metrics exposition
//!
//! - `devserver_logins_total` (counter): label `outcome`
//! - `devserver_token_refreshes_total` (counter)

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering
/// metrics. The handle's `render()` output is served on `/metrics`.
pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder")
}

/// Record a login attempt with its outcome label.
pub fn record_login(outcome: &str) {
    metrics::counter!("devserver_logins_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record an issued token refresh.
pub fn record_refresh() {
    metrics::counter!("devserver_token_refreshes_total").increment(1);
}
