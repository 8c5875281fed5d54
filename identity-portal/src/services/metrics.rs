use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

use portal_core::error::AppError;

pub struct PortalMetrics {
    registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub invite_validations_total: IntCounterVec,
}

static METRICS: OnceLock<PortalMetrics> = OnceLock::new();

fn build_metrics() -> Result<PortalMetrics, prometheus::Error> {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;

    let http_request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;

    let invite_validations_total = IntCounterVec::new(
        Opts::new(
            "invite_validations_total",
            "Invite code validations by outcome",
        ),
        &["outcome"],
    )?;

    registry.register(Box::new(http_requests_total.clone()))?;
    registry.register(Box::new(http_request_duration_seconds.clone()))?;
    registry.register(Box::new(invite_validations_total.clone()))?;

    Ok(PortalMetrics {
        registry,
        http_requests_total,
        http_request_duration_seconds,
        invite_validations_total,
    })
}

/// Create the registry once; later calls are no-ops.
pub fn init_metrics() -> Result<(), AppError> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let metrics = build_metrics()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to build metrics: {}", e)))?;
    let _ = METRICS.set(metrics);
    Ok(())
}

pub fn metrics() -> Option<&'static PortalMetrics> {
    METRICS.get()
}

/// Count an invite validation. No-op before `init_metrics`.
pub fn record_invite_validation(outcome: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .invite_validations_total
            .with_label_values(&[outcome])
            .inc();
    }
}

pub fn get_metrics() -> Result<String, AppError> {
    let metrics = METRICS.get().ok_or(AppError::ServiceUnavailable)?;

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&metrics.registry.gather(), &mut buffer)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode metrics: {}", e)))?;

    String::from_utf8(buffer).map_err(|e| AppError::InternalError(e.into()))
}
