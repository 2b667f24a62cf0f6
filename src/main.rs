//! Sleep Disorder Predictor: binary entrypoint
//! Boots the Axum HTTP server: config, model artifact, metrics, routes.

use shuttle_axum::ShuttleAxum;

use sleep_disorder_predictor::logging;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up SLEEP_CONFIG_PATH / SLEEP_MODEL_PATH / SLEEP_QUALITY_MODE.
    let _ = dotenvy::dotenv();

    // Compact dev tracing (SLEEP_DEV_LOG=1 in a dev environment only).
    if logging::dev_logging_enabled() {
        logging::init_tracing();
    }

    let router = sleep_disorder_predictor::app().await?;

    Ok(router.into())
}
