//! Prometheus metrics for the prediction service.
//!
//! Series:
//! - `sleep_predictions_total{label}`
//! - `sleep_quality_scores_total{source,score}`
//! - `sleep_invalid_input_total{field}`
//! - `sleep_model_errors_total`

use axum::{routing::get, Router};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::assess::Assessment;

// A process can only hold one global recorder.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (first call) or reuse it.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                let handle = PrometheusBuilder::new().install_recorder()?;
                // Touch every series so a fresh scrape lists them.
                counter!("sleep_model_errors_total").absolute(0);
                Ok::<_, anyhow::Error>(handle)
            })?
            .clone();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_assessment(a: &Assessment) {
    counter!("sleep_predictions_total", "label" => a.prediction.as_str()).increment(1);
    counter!(
        "sleep_quality_scores_total",
        "source" => a.quality.source.as_str(),
        "score" => a.quality.score.to_string()
    )
    .increment(1);
}

pub fn record_invalid_input(field: &'static str) {
    counter!("sleep_invalid_input_total", "field" => field).increment(1);
}

pub fn record_model_error() {
    counter!("sleep_model_errors_total").increment(1);
}
