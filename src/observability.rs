use std::net::SocketAddr;
use std::time::Duration;

use crate::engine::EngineError;
use crate::model::AvailabilityResponse;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: availability checks answered. Labels: outcome.
pub const CHECKS_TOTAL: &str = "courtslot_checks_total";

/// Histogram: time spent in the check path, in seconds.
pub const CHECK_DURATION_SECONDS: &str = "courtslot_check_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: resources held by the registry.
pub const RESOURCES_LOADED: &str = "courtslot_resources_loaded";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a check result to a short label for metrics.
pub fn outcome_label(result: &Result<AvailabilityResponse, EngineError>) -> &'static str {
    match result {
        Ok(r) if r.is_available => "available",
        Ok(_) => "conflict",
        Err(e) => e.kind(),
    }
}

pub fn record_check(result: &Result<AvailabilityResponse, EngineError>, elapsed: Duration) {
    metrics::counter!(CHECKS_TOTAL, "outcome" => outcome_label(result)).increment(1);
    metrics::histogram!(CHECK_DURATION_SECONDS).record(elapsed.as_secs_f64());
}
