//! HTTP surface: HTML form flow plus a JSON API over the same pipeline.
//!
//! - `GET  /health`       → "ok"
//! - `GET  /`             → form (`?mode=text|slider` overrides config)
//! - `POST /predict`      → url-encoded form → result page (422 page on bad input)
//! - `POST /api/predict`  → JSON `FormInput` → JSON `Assessment` (422 `{error, field}` on bad input)
//!
//! Bodies that fail to decode at all get the same 422 treatment, with `field = "body"`.
//! - `POST /api/quality`  → `{"text"}` → heuristic score + matched keyword
//! - `GET  /metrics`      → Prometheus exposition (when enabled)

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use crate::assess::{assess, Assessment};
use crate::config::AppConfig;
use crate::error::{InputError, ModelError};
use crate::features::{FormInput, QualityMode};
use crate::metrics::{self, Metrics};
use crate::model::Classifier;
use crate::quality::{self, QualityCategory};
use crate::render;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub config: Arc<AppConfig>,
    pub metrics: Option<Metrics>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>, config: AppConfig) -> Self {
        Self {
            classifier,
            config: Arc::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/api/quality", post(quality_json))
        .layer(CorsLayer::very_permissive())
        .with_state(state.clone());

    if let Some(m) = &state.metrics {
        app = app.merge(m.router());
    }
    app
}

/// Request-time failure, mapped to 422 (input) or 500 (model).
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be decoded into a `FormInput`.
    Malformed(String),
    Input(InputError),
    Model(ModelError),
}

/// Field label used for bodies that fail to decode.
const BODY_FIELD: &str = "body";

/// Log and count a body that failed to decode; returns the detail for the response.
fn note_malformed(detail: String) -> String {
    warn!(error = %detail, "undecodable submission");
    metrics::record_invalid_input(BODY_FIELD);
    detail
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: detail,
                    field: Some(BODY_FIELD),
                }),
            )
                .into_response(),
            Self::Input(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: e.to_string(),
                    field: Some(e.field()),
                }),
            )
                .into_response(),
            // detail stays in the logs
            Self::Model(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "prediction failed".into(),
                    field: None,
                }),
            )
                .into_response(),
        }
    }
}

/// validate → assess → metrics. Shared by the HTML and JSON routes.
fn run(state: &AppState, input: &FormInput) -> Result<Assessment, ApiError> {
    let profile = input.validate().inspect_err(|e| {
        warn!(field = e.field(), "rejected submission: {}", e);
        metrics::record_invalid_input(e.field());
    })?;

    let assessment = assess(&profile, state.classifier.as_ref()).inspect_err(|e| {
        error!(model = state.classifier.name(), error = %e, "classifier failed");
        metrics::record_model_error();
    })?;

    metrics::record_assessment(&assessment);
    Ok(assessment)
}

#[derive(Deserialize)]
struct ModeQuery {
    #[serde(default)]
    mode: Option<String>,
}

async fn index(State(state): State<AppState>, Query(q): Query<ModeQuery>) -> Html<String> {
    let mode = q
        .mode
        .and_then(|m| m.parse::<QualityMode>().ok())
        .unwrap_or(state.config.form.quality_mode);
    Html(render::form_page(mode))
}

async fn predict_form(
    State(state): State<AppState>,
    form: Result<Form<FormInput>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            let detail = note_malformed(rejection.body_text());
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render::rejected_page(state.config.form.quality_mode, &detail)),
            );
        }
    };
    let mode = render::mode_of(&input, state.config.form.quality_mode);
    match run(&state, &input) {
        Ok(a) => (StatusCode::OK, Html(render::result_page(mode, &input, &a))),
        Err(ApiError::Input(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::error_page(mode, &input, &e)),
        ),
        Err(ApiError::Malformed(detail)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render::rejected_page(mode, &detail)),
        ),
        Err(ApiError::Model(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render::error_page_internal(mode, &input)),
        ),
    }
}

async fn predict_json(
    State(state): State<AppState>,
    body: Result<Json<FormInput>, JsonRejection>,
) -> Result<Json<Assessment>, ApiError> {
    let Json(input) =
        body.map_err(|rejection| ApiError::Malformed(note_malformed(rejection.body_text())))?;
    run(&state, &input).map(Json)
}

#[derive(Deserialize)]
struct QualityReq {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct QualityResp {
    score: u8,
    category: Option<QualityCategory>,
    keyword: Option<&'static str>,
}

async fn quality_json(Json(body): Json<QualityReq>) -> Json<QualityResp> {
    let m = quality::explain(&body.text);
    Json(QualityResp {
        score: m.map(|m| m.score).unwrap_or(quality::DEFAULT_QUALITY_SCORE),
        category: m.map(|m| m.category),
        keyword: m.map(|m| m.keyword),
    })
}
