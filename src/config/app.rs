// src/config/app.rs
//! `config/app.toml` schema:
//!
//! ```toml
//! [model]
//! path = "models/sleep_model.json"
//!
//! [form]
//! quality_mode = "text"   # "text" | "slider"
//!
//! [metrics]
//! enabled = true
//! ```
//!
//! Resolution order: file (or defaults when the file is absent) → env overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::features::QualityMode;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";
pub const DEFAULT_MODEL_PATH: &str = "models/sleep_model.json";

pub const ENV_CONFIG_PATH: &str = "SLEEP_CONFIG_PATH";
pub const ENV_MODEL_PATH: &str = "SLEEP_MODEL_PATH";
pub const ENV_QUALITY_MODE: &str = "SLEEP_QUALITY_MODE";
pub const ENV_METRICS: &str = "SLEEP_METRICS";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelSection,
    pub form: FormSection,
    pub metrics: MetricsSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub path: PathBuf,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormSection {
    pub quality_mode: QualityMode,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetricsSection {
    pub enabled: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Load from SLEEP_CONFIG_PATH (or `config/app.toml`) and apply env overrides.
    /// A missing file is not an error; a malformed one is.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config at {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Env overrides. Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(p) = std::env::var(ENV_MODEL_PATH) {
            if !p.trim().is_empty() {
                self.model.path = PathBuf::from(p.trim());
            }
        }

        if let Ok(raw) = std::env::var(ENV_QUALITY_MODE) {
            match raw.parse::<QualityMode>() {
                Ok(mode) => self.form.quality_mode = mode,
                Err(e) => warn!(error = %e, "ignoring {}", ENV_QUALITY_MODE),
            }
        }

        if let Some(on) = parse_flag(std::env::var(ENV_METRICS).ok()) {
            self.metrics.enabled = on;
        }
    }
}

// "1"/"true"/"on" → Some(true), "0"/"false"/"off" → Some(false), else None
fn parse_flag(raw: Option<String>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
