//! # Classifier
//! The pretrained scaler/model pair sits behind [`Classifier`]: one method,
//! feature vector in, integer label out. Handlers and tests only see the trait.
//!
//! The bundled implementation, [`ScaledClassifier`], replays a standard scaler
//! followed by a linear multi-class model exported to JSON. The artifact
//! records the feature names it was fit on; they are checked against
//! [`FEATURE_NAMES`] at load time so a column-order mismatch is caught before
//! the first prediction instead of producing silently wrong labels.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ModelError;
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Opaque inference collaborator.
pub trait Classifier: Send + Sync {
    /// Raw class label for one feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError>;
    /// Model name for diagnostics.
    fn name(&self) -> &str;
}

/// Rendered outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    NoDisorder,
    Insomnia,
    SleepApnea,
}

impl Prediction {
    /// 0 → no disorder, 1 → insomnia, anything else → sleep apnea.
    pub fn from_label(label: i64) -> Self {
        match label {
            0 => Self::NoDisorder,
            1 => Self::Insomnia,
            _ => Self::SleepApnea,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::NoDisorder => "No Sleep Disorder Detected",
            Self::Insomnia => "Insomnia Detected",
            Self::SleepApnea => "Sleep Apnea Detected",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Self::NoDisorder => "Your sleep pattern appears healthy.",
            Self::Insomnia => "Consider improving sleep routine and stress management.",
            Self::SleepApnea => "Medical consultation is recommended.",
        }
    }

    /// Metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDisorder => "no_disorder",
            Self::Insomnia => "insomnia",
            Self::SleepApnea => "sleep_apnea",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDisorder => write!(f, "no disorder"),
            Self::Insomnia => write!(f, "insomnia"),
            Self::SleepApnea => write!(f, "sleep apnea"),
        }
    }
}

/// Per-column standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        let cols = features.as_slice().iter().zip(&self.mean).zip(&self.scale);
        for (slot, ((x, mean), scale)) in out.iter_mut().zip(cols) {
            // zero-variance columns are left unscaled
            let s = if *scale == 0.0 { 1.0 } else { *scale };
            *slot = (x - mean) / s;
        }
        out
    }
}

/// Linear multi-class model: one row of weights per class, argmax wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    /// Per-class decision values `w·x + b`.
    pub fn decision_function(&self, x: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(x).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }

    /// Label of the highest decision value; ties go to the earlier class.
    pub fn predict_scaled(&self, x: &[f64]) -> Option<i64> {
        let scores = self.decision_function(x);
        let mut best: Option<(i64, f64)> = None;
        for (&class, s) in self.classes.iter().zip(scores) {
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((class, s)),
            }
        }
        best.map(|(class, _)| class)
    }
}

/// On-disk shape of an exported scaler + classifier pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), ModelError> {
        let names: Vec<&str> = self.feature_names.iter().map(String::as_str).collect();
        if names != FEATURE_NAMES {
            return Err(ModelError::Artifact(format!(
                "feature_names {:?} do not match expected {:?}",
                names, FEATURE_NAMES
            )));
        }
        if self.scaler.mean.len() != FEATURE_COUNT || self.scaler.scale.len() != FEATURE_COUNT {
            return Err(ModelError::Artifact(format!(
                "scaler must have {} means and scales (got {} / {})",
                FEATURE_COUNT,
                self.scaler.mean.len(),
                self.scaler.scale.len()
            )));
        }
        if self.classes.is_empty() {
            return Err(ModelError::Artifact("no classes".into()));
        }
        if self.coefficients.len() != self.classes.len()
            || self.intercepts.len() != self.classes.len()
        {
            return Err(ModelError::Artifact(format!(
                "{} classes but {} coefficient rows and {} intercepts",
                self.classes.len(),
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }
        if let Some(row) = self.coefficients.iter().position(|r| r.len() != FEATURE_COUNT) {
            return Err(ModelError::Artifact(format!(
                "coefficient row {} has {} entries, expected {}",
                row,
                self.coefficients[row].len(),
                FEATURE_COUNT
            )));
        }

        let all_finite = self
            .scaler
            .mean
            .iter()
            .chain(&self.scaler.scale)
            .chain(self.coefficients.iter().flatten())
            .chain(&self.intercepts)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelError::Artifact("non-finite parameter".into()));
        }
        Ok(())
    }
}

/// Scaler followed by a linear classifier, loaded from a [`ModelArtifact`].
#[derive(Debug, Clone)]
pub struct ScaledClassifier {
    name: String,
    scaler: StandardScaler,
    model: LinearClassifier,
}

impl ScaledClassifier {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;
        Ok(Self {
            name: artifact.name,
            scaler: artifact.scaler,
            model: LinearClassifier {
                classes: artifact.classes,
                coefficients: artifact.coefficients,
                intercepts: artifact.intercepts,
            },
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(s)?;
        Self::from_artifact(artifact)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let clf = Self::from_json_str(&raw)?;
        info!(
            model = %clf.name,
            classes = clf.model.classes.len(),
            path = %path.display(),
            "model artifact loaded"
        );
        Ok(clf)
    }
}

impl Classifier for ScaledClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        let scaled = self.scaler.transform(features);
        self.model
            .predict_scaled(&scaled)
            .ok_or_else(|| ModelError::Inference("model produced no decision values".into()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ModelArtifact {
        // Insomnia row keys on stress, apnea row on systolic BP.
        let mut w_none = vec![0.0; FEATURE_COUNT];
        w_none[3] = 1.0;
        let mut w_insomnia = vec![0.0; FEATURE_COUNT];
        w_insomnia[5] = 1.0;
        let mut w_apnea = vec![0.0; FEATURE_COUNT];
        w_apnea[9] = 1.0;

        ModelArtifact {
            name: "unit".into(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            scaler: StandardScaler {
                mean: vec![0.0, 50.0, 7.0, 6.0, 5.0, 5.0, 1.0, 70.0, 7000.0, 125.0, 80.0],
                scale: vec![1.0, 10.0, 1.0, 1.0, 2.0, 1.0, 1.0, 10.0, 3000.0, 10.0, 10.0],
            },
            classes: vec![0, 1, 2],
            coefficients: vec![w_none, w_insomnia, w_apnea],
            intercepts: vec![0.0, 0.0, 0.0],
        }
    }

    fn fv(quality: f64, stress: f64, systolic: f64) -> FeatureVector {
        FeatureVector::new([
            0.0, 50.0, 7.0, quality, 5.0, stress, 1.0, 70.0, 7000.0, systolic, 80.0,
        ])
    }

    #[test]
    fn label_mapping_has_catch_all() {
        assert_eq!(Prediction::from_label(0), Prediction::NoDisorder);
        assert_eq!(Prediction::from_label(1), Prediction::Insomnia);
        assert_eq!(Prediction::from_label(2), Prediction::SleepApnea);
        assert_eq!(Prediction::from_label(-7), Prediction::SleepApnea);
        assert_eq!(Prediction::from_label(1).to_string(), "insomnia");
        assert_eq!(Prediction::NoDisorder.to_string(), "no disorder");
        assert_eq!(Prediction::SleepApnea.to_string(), "sleep apnea");
    }

    #[test]
    fn scaler_centres_and_handles_zero_scale() {
        let s = StandardScaler {
            mean: vec![1.0; FEATURE_COUNT],
            scale: {
                let mut v = vec![2.0; FEATURE_COUNT];
                v[0] = 0.0;
                v
            },
        };
        let out = s.transform(&FeatureVector::new([3.0; FEATURE_COUNT]));
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], 1.0);
    }

    #[test]
    fn argmax_picks_class_and_breaks_ties_early() {
        let m = LinearClassifier {
            classes: vec![10, 20],
            coefficients: vec![vec![1.0], vec![1.0]],
            intercepts: vec![0.5, 0.5],
        };
        assert_eq!(m.predict_scaled(&[1.0]), Some(10));

        let empty = LinearClassifier {
            classes: vec![],
            coefficients: vec![],
            intercepts: vec![],
        };
        assert_eq!(empty.predict_scaled(&[1.0]), None);
    }

    #[test]
    fn short_hand_built_parts_do_not_panic() {
        let s = StandardScaler {
            mean: vec![1.0; 2],
            scale: vec![1.0; 2],
        };
        let out = s.transform(&FeatureVector::new([3.0; FEATURE_COUNT]));
        assert_eq!(out[1], 2.0);
        assert_eq!(out[FEATURE_COUNT - 1], 0.0);

        // three weight rows, one class
        let m = LinearClassifier {
            classes: vec![4],
            coefficients: vec![vec![0.0], vec![1.0], vec![2.0]],
            intercepts: vec![0.0, 0.0, 0.0],
        };
        assert_eq!(m.predict_scaled(&[1.0]), Some(4));
    }

    #[test]
    fn scaled_classifier_predicts() {
        let clf = ScaledClassifier::from_artifact(artifact()).unwrap();
        assert_eq!(clf.name(), "unit");
        assert_eq!(clf.predict(&fv(9.0, 5.0, 125.0)).unwrap(), 0);
        assert_eq!(clf.predict(&fv(6.0, 9.0, 125.0)).unwrap(), 1);
        assert_eq!(clf.predict(&fv(6.0, 5.0, 180.0)).unwrap(), 2);
    }

    #[test]
    fn rejects_reordered_feature_names() {
        let mut a = artifact();
        a.feature_names.swap(0, 1);
        let err = ScaledClassifier::from_artifact(a).unwrap_err();
        assert!(matches!(err, ModelError::Artifact(m) if m.contains("feature_names")));
    }

    #[test]
    fn rejects_shape_mismatches() {
        let mut a = artifact();
        a.intercepts.pop();
        assert!(ScaledClassifier::from_artifact(a).is_err());

        let mut a = artifact();
        a.coefficients[1].push(0.0);
        assert!(ScaledClassifier::from_artifact(a).is_err());

        let mut a = artifact();
        a.scaler.scale.truncate(3);
        assert!(ScaledClassifier::from_artifact(a).is_err());

        let mut a = artifact();
        a.scaler.mean[4] = f64::INFINITY;
        assert!(ScaledClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn loads_json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, serde_json::to_string(&artifact()).unwrap()).unwrap();

        let clf = ScaledClassifier::load_from_file(&path).unwrap();
        assert_eq!(clf.predict(&fv(6.0, 9.0, 125.0)).unwrap(), 1);

        assert!(matches!(
            ScaledClassifier::load_from_file(dir.path().join("missing.json")),
            Err(ModelError::Io(_))
        ));
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            ScaledClassifier::load_from_file(&path),
            Err(ModelError::Json(_))
        ));
    }
}
