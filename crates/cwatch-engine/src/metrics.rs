//! Prometheus metrics for the decision engine.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

/// Metric names.
pub mod names {
    pub const CYCLES_TOTAL: &str = "cwatch_cycles_total";
    pub const SNAPSHOT_FAILURES_TOTAL: &str = "cwatch_snapshot_failures_total";
    pub const DETECTOR_FAILURES_TOTAL: &str = "cwatch_detector_failures_total";
    pub const DETECTIONS_TOTAL: &str = "cwatch_detections_total";
    pub const CONFIRMATIONS_TOTAL: &str = "cwatch_confirmations_total";
    pub const SUPPRESSIONS_TOTAL: &str = "cwatch_suppressions_total";
    pub const ACTIVATIONS_TOTAL: &str = "cwatch_activations_total";
    pub const ACTIVATION_FAILURES_TOTAL: &str = "cwatch_activation_failures_total";
    pub const DRY_RUN_DECISIONS_TOTAL: &str = "cwatch_dry_run_decisions_total";
}

/// Install the Prometheus exporter when `CWATCH_METRICS_ADDR` is set.
///
/// Without the variable, metric calls stay no-ops and the daemon runs
/// without a scrape endpoint.
pub fn maybe_init_exporter() {
    let Ok(addr) = std::env::var("CWATCH_METRICS_ADDR") else {
        return;
    };

    match addr.parse::<SocketAddr>() {
        Ok(socket) => match PrometheusBuilder::new().with_http_listener(socket).install() {
            Ok(()) => info!(addr = %socket, "Prometheus exporter listening"),
            Err(e) => warn!("Failed to install Prometheus exporter: {}", e),
        },
        Err(e) => warn!(addr = %addr, "Invalid CWATCH_METRICS_ADDR: {}", e),
    }
}

pub fn record_cycle(camera: &str) {
    counter!(names::CYCLES_TOTAL, "camera" => camera.to_string()).increment(1);
}

pub fn record_snapshot_failure(camera: &str) {
    counter!(names::SNAPSHOT_FAILURES_TOTAL, "camera" => camera.to_string()).increment(1);
}

pub fn record_detector_failure(camera: &str, kind: &'static str) {
    counter!(
        names::DETECTOR_FAILURES_TOTAL,
        "camera" => camera.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_detections(camera: &str, count: usize) {
    if count > 0 {
        counter!(names::DETECTIONS_TOTAL, "camera" => camera.to_string())
            .increment(count as u64);
    }
}

pub fn record_confirmation(zone: &str) {
    counter!(names::CONFIRMATIONS_TOTAL, "zone" => zone.to_string()).increment(1);
}

pub fn record_suppression(zone: &str, gate: &'static str) {
    counter!(
        names::SUPPRESSIONS_TOTAL,
        "zone" => zone.to_string(),
        "gate" => gate
    )
    .increment(1);
}

pub fn record_activation(zone: &str) {
    counter!(names::ACTIVATIONS_TOTAL, "zone" => zone.to_string()).increment(1);
}

pub fn record_activation_failure(zone: &str) {
    counter!(names::ACTIVATION_FAILURES_TOTAL, "zone" => zone.to_string()).increment(1);
}

pub fn record_dry_run(zone: &str) {
    counter!(names::DRY_RUN_DECISIONS_TOTAL, "zone" => zone.to_string()).increment(1);
}
