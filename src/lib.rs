// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod assess;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod quality;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::assess::{assess, Assessment};
pub use crate::error::{InputError, ModelError};
pub use crate::features::{FeatureVector, FormInput, HealthProfile, FEATURE_NAMES};
pub use crate::model::{Classifier, Prediction, ScaledClassifier};
pub use crate::quality::quality_from_text;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// Build the full application router from config on disk + env.
///
/// Loads `config/app.toml` (or SLEEP_CONFIG_PATH), the model artifact it
/// points at, and installs the metrics recorder when enabled. Fails if the
/// artifact is missing or does not match the expected feature layout.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::load()?;

    let classifier = ScaledClassifier::load_from_file(&cfg.model.path)
        .with_context(|| format!("loading model artifact {}", cfg.model.path.display()))?;

    info!(
        model = classifier.name(),
        quality_mode = %cfg.form.quality_mode,
        metrics = cfg.metrics.enabled,
        "sleep disorder predictor ready"
    );

    let metrics_on = cfg.metrics.enabled;
    let mut state = AppState::new(Arc::new(classifier), cfg);
    if metrics_on {
        state = state.with_metrics(Metrics::init()?);
    }
    Ok(router(state))
}
