use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

/// Lifecycle transitions of exam attempts, exported as counters.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AttemptEvent {
    Started,
    Resumed,
    AnswersSaved,
    Submitted,
}

impl AttemptEvent {
    fn counter_name(self) -> &'static str {
        match self {
            Self::Started => "exam_attempts_started_total",
            Self::Resumed => "exam_attempts_resumed_total",
            Self::AnswersSaved => "exam_answers_saved_total",
            Self::Submitted => "exam_attempts_submitted_total",
        }
    }
}

pub(crate) fn record_attempt_event(event: AttemptEvent) {
    metrics::counter!(event.counter_name()).increment(1);
}

/// Request counter and latency histogram, labelled by status class and code.
pub(crate) fn record_http_request(status: u16, latency: std::time::Duration) {
    let class = match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    let status = status.to_string();
    metrics::counter!("http_requests_total", "class" => class, "status" => status.clone())
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "class" => class, "status" => status)
        .record(latency.as_secs_f64());
}
