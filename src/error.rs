//! Error types for form validation and model inference.

/// Rejected form input. Every variant names the offending field so the
/// HTTP layer can point the user at it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field}: unknown choice '{value}'")]
    UnknownChoice { field: &'static str, value: String },

    #[error("{field}: {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("sleep_quality: give either a description or a rating, not both")]
    ConflictingQuality,
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownChoice { field, .. } | Self::OutOfRange { field, .. } => field,
            Self::ConflictingQuality => "sleep_quality",
        }
    }
}

/// Failures loading or running the classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid model artifact: {0}")]
    Artifact(String),

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inference failed: {0}")]
    Inference(String),
}
