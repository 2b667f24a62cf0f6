//! # Assessment Pipeline
//! Pure mapping `HealthProfile` → `Assessment`:
//! quality score → feature vector → classifier → prediction.
//! Nothing is stored; each call is independent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ModelError;
use crate::features::{FeatureVector, HealthProfile, SleepQualityInput};
use crate::logging::{anon_hash, dev_logging_enabled};
use crate::model::{Classifier, Prediction};
use crate::quality::{self, QualityCategory};

/// Where the sleep quality score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualitySource {
    /// Derived from a free-text description.
    Derived,
    /// Entered directly on the slider.
    Rated,
}

impl QualitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Derived => "derived",
            Self::Rated => "rated",
        }
    }
}

/// Resolved sleep quality plus the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub score: u8,
    pub source: QualitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<QualityCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<&'static str>,
}

impl QualityReport {
    pub fn resolve(input: &SleepQualityInput) -> Self {
        match input {
            SleepQualityInput::Described(text) => {
                let m = quality::explain(text);
                Self {
                    score: m
                        .map(|m| m.score)
                        .unwrap_or(quality::DEFAULT_QUALITY_SCORE),
                    source: QualitySource::Derived,
                    category: m.map(|m| m.category),
                    keyword: m.map(|m| m.keyword),
                }
            }
            SleepQualityInput::Rated(score) => Self {
                score: *score,
                source: QualitySource::Rated,
                category: None,
                keyword: None,
            },
        }
    }
}

/// Everything the result page and the JSON API report for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub prediction: Prediction,
    /// Human-readable label: "no disorder" | "insomnia" | "sleep apnea".
    pub label: String,
    pub headline: &'static str,
    pub advice: &'static str,
    pub quality: QualityReport,
    pub features: FeatureVector,
    pub model: String,
    pub evaluated_at: DateTime<Utc>,
}

/// Run one submission through the classifier.
pub fn assess(
    profile: &HealthProfile,
    classifier: &dyn Classifier,
) -> Result<Assessment, ModelError> {
    let quality = QualityReport::resolve(&profile.sleep_quality);
    let features = profile.to_features(quality.score);

    let raw = classifier.predict(&features)?;
    let prediction = Prediction::from_label(raw);

    if dev_logging_enabled() {
        let text_id = match &profile.sleep_quality {
            SleepQualityInput::Described(t) => anon_hash(t),
            SleepQualityInput::Rated(_) => String::from("-"),
        };
        // Never log the description itself.
        debug!(
            target: "assess",
            %text_id,
            score = quality.score,
            source = quality.source.as_str(),
            keyword = quality.keyword.unwrap_or("-"),
            raw_label = raw,
            prediction = prediction.as_str(),
            features = ?features.as_slice(),
            "assessed"
        );
    }

    Ok(Assessment {
        prediction,
        label: prediction.to_string(),
        headline: prediction.headline(),
        advice: prediction.advice(),
        quality,
        features,
        model: classifier.name().to_string(),
        evaluated_at: Utc::now(),
    })
}
