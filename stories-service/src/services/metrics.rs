//! Prometheus recorder for the process.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

/// Outcome of the one install attempt, shared by every caller.
static METRICS_HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Install the global recorder. Safe to call from several threads; only the
/// first call installs, the rest see its outcome.
pub fn init_metrics() -> Result<(), AppError> {
    METRICS_HANDLE
        .get_or_init(install_recorder)
        .as_ref()
        .map(|_| ())
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "failed to install Prometheus recorder: {}",
                e
            ))
        })
}

fn install_recorder() -> Result<PrometheusHandle, String> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| e.to_string())?;

    describe_counter!("http_requests_total", "HTTP requests by route and status");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency by route and status"
    );
    describe_counter!("stories_served_total", "Story documents returned to clients");

    Ok(handle)
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .and_then(|installed| installed.as_ref().ok())
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}
