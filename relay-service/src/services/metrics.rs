//! Metrics collection for relay-service.
//!
//! HTTP request metrics come from the shared middleware; the helpers here
//! count upstream calls and enquiry outcomes.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one outbound call to an upstream provider.
pub fn record_provider_call(provider: &'static str, status: &'static str) {
    counter!(
        "relay_upstream_calls_total",
        "provider" => provider,
        "status" => status
    )
    .increment(1);
}

/// Record how an enquiry submission was resolved.
pub fn record_lead(outcome: &'static str) {
    counter!("relay_leads_total", "outcome" => outcome).increment(1);
}
