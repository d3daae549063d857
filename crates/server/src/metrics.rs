//! Prometheus metrics
//!
//! Request counters, hand-off counters, escalation score distribution,
//! and external-call latencies, rendered at `GET /metrics`.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder and register metric descriptions
///
/// Safe to call more than once; later calls reuse the first recorder.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            describe_counter!("heliodesk_requests_total", "Requests received, by outcome");
            describe_counter!("heliodesk_handoffs_total", "Human hand-offs, by reason");
            describe_counter!("heliodesk_errors_total", "Pipeline errors, by kind");
            describe_histogram!(
                "heliodesk_escalation_score",
                "Escalation score observed after each update"
            );
            describe_histogram!(
                "heliodesk_request_seconds",
                "End-to-end /ask latency in seconds"
            );

            handle
        })
        .clone()
}

/// Render the current metrics snapshot
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Count one request by outcome ("answer", "handoff", "error", "rejected")
pub fn record_request(outcome: &'static str) {
    counter!("heliodesk_requests_total", "outcome" => outcome).increment(1);
}

/// Count one hand-off by reason
pub fn record_handoff(reason: &'static str) {
    counter!("heliodesk_handoffs_total", "reason" => reason).increment(1);
}

/// Count one pipeline error by kind
pub fn record_error(kind: &'static str) {
    counter!("heliodesk_errors_total", "kind" => kind).increment(1);
}

/// Observe an escalation score after an update
pub fn record_score(score: u8) {
    histogram!("heliodesk_escalation_score").record(score as f64);
}

/// Observe one end-to-end /ask latency
pub fn record_request_latency(elapsed: Duration) {
    histogram!("heliodesk_request_seconds").record(elapsed.as_secs_f64());
}
