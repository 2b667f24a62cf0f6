//! # Feature Assembly
//! Form fields → typed, range-checked profile → fixed-order feature vector.
//!
//! The classifier is fit on exactly [`FEATURE_NAMES`], in that order. The
//! vector is a fixed-size array so its length cannot drift; order is owned by
//! [`HealthProfile::to_features`] alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const FEATURE_COUNT: usize = 11;

/// Canonical column order the scaler/model pair was fit on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "gender",
    "age",
    "sleep_duration",
    "sleep_quality",
    "physical_activity",
    "stress_level",
    "bmi_category",
    "heart_rate",
    "daily_steps",
    "systolic_bp",
    "diastolic_bp",
];

/// Declared bounds of the numeric form fields (inclusive).
pub mod bounds {
    pub const AGE: (i64, i64) = (10, 100);
    pub const SLEEP_DURATION: (f64, f64) = (0.0, 15.0);
    pub const SLEEP_QUALITY: (i64, i64) = (1, 10);
    pub const PHYSICAL_ACTIVITY: (i64, i64) = (1, 10);
    pub const STRESS_LEVEL: (i64, i64) = (1, 10);
    pub const HEART_RATE: (i64, i64) = (40, 150);
    pub const DAILY_STEPS: (i64, i64) = (0, 30_000);
    pub const SYSTOLIC_BP: (i64, i64) = (80, 200);
    pub const DIASTOLIC_BP: (i64, i64) = (50, 130);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const CHOICES: [&'static str; 2] = ["Male", "Female"];

    pub fn code(&self) -> f64 {
        match self {
            Self::Male => 0.0,
            Self::Female => 1.0,
        }
    }
}

impl FromStr for Gender {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(InputError::UnknownChoice {
                field: "gender",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const CHOICES: [&'static str; 3] = ["Normal", "Overweight", "Obese"];

    pub fn code(&self) -> f64 {
        match self {
            Self::Normal => 0.0,
            Self::Overweight => 1.0,
            Self::Obese => 2.0,
        }
    }
}

impl FromStr for BmiCategory {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "overweight" => Ok(Self::Overweight),
            "obese" => Ok(Self::Obese),
            _ => Err(InputError::UnknownChoice {
                field: "bmi",
                value: s.to_string(),
            }),
        }
    }
}

/// Which widget the form offers for sleep quality.
///
/// Deserializes through [`FromStr`], so config files accept the same
/// case-insensitive spellings as the env var and `?mode=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum QualityMode {
    /// Free-text description scored by the keyword heuristic.
    #[default]
    Text,
    /// Direct 1–10 rating.
    Slider,
}

impl FromStr for QualityMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "slider" => Ok(Self::Slider),
            _ => Err(InputError::UnknownChoice {
                field: "quality_mode",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for QualityMode {
    type Error = InputError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for QualityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Slider => write!(f, "slider"),
        }
    }
}

/// The two alternate ways a submission supplies sleep quality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SleepQualityInput {
    Described(String),
    Rated(u8),
}

/// Raw submission as posted by the HTML form or a JSON client.
///
/// Integers are wide and signed so that out-of-range values reach
/// [`FormInput::validate`] and get a field-specific error instead of a
/// generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    pub gender: String,
    pub age: i64,
    pub sleep_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<i64>,
    pub physical_activity: i64,
    pub stress_level: i64,
    pub bmi: String,
    pub heart_rate: i64,
    pub daily_steps: i64,
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
}

impl FormInput {
    /// Parse categorical fields and check every numeric bound.
    /// Stops at the first offending field, in form order.
    pub fn validate(&self) -> Result<HealthProfile, InputError> {
        let gender = self.gender.parse::<Gender>()?;
        let age = check_int("age", self.age, bounds::AGE)?;
        let sleep_duration = check_float(
            "sleep_duration",
            self.sleep_duration,
            bounds::SLEEP_DURATION,
        )?;

        let sleep_quality = match (&self.sleep_quality_text, self.sleep_quality) {
            (Some(_), Some(_)) => return Err(InputError::ConflictingQuality),
            (_, Some(rating)) => SleepQualityInput::Rated(
                check_int("sleep_quality", rating, bounds::SLEEP_QUALITY)? as u8,
            ),
            (Some(text), None) => SleepQualityInput::Described(text.clone()),
            (None, None) => SleepQualityInput::Described(String::new()),
        };

        let physical_activity =
            check_int("physical_activity", self.physical_activity, bounds::PHYSICAL_ACTIVITY)?;
        let stress_level = check_int("stress_level", self.stress_level, bounds::STRESS_LEVEL)?;
        let bmi = self.bmi.parse::<BmiCategory>()?;
        let heart_rate = check_int("heart_rate", self.heart_rate, bounds::HEART_RATE)?;
        let daily_steps = check_int("daily_steps", self.daily_steps, bounds::DAILY_STEPS)?;
        let systolic_bp = check_int("systolic_bp", self.systolic_bp, bounds::SYSTOLIC_BP)?;
        let diastolic_bp = check_int("diastolic_bp", self.diastolic_bp, bounds::DIASTOLIC_BP)?;

        Ok(HealthProfile {
            gender,
            age: age as u8,
            sleep_duration,
            sleep_quality,
            physical_activity: physical_activity as u8,
            stress_level: stress_level as u8,
            bmi,
            heart_rate: heart_rate as u16,
            daily_steps: daily_steps as u32,
            systolic_bp: systolic_bp as u16,
            diastolic_bp: diastolic_bp as u16,
        })
    }
}

fn check_int(field: &'static str, value: i64, (min, max): (i64, i64)) -> Result<i64, InputError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

fn check_float(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, InputError> {
    // NaN fails `contains`, so non-finite input is rejected here too.
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Validated submission. Every field is within its declared bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthProfile {
    pub gender: Gender,
    pub age: u8,
    pub sleep_duration: f64,
    pub sleep_quality: SleepQualityInput,
    pub physical_activity: u8,
    pub stress_level: u8,
    pub bmi: BmiCategory,
    pub heart_rate: u16,
    pub daily_steps: u32,
    pub systolic_bp: u16,
    pub diastolic_bp: u16,
}

impl HealthProfile {
    /// Lay the profile out in [`FEATURE_NAMES`] order with the resolved quality score.
    pub fn to_features(&self, sleep_quality_score: u8) -> FeatureVector {
        FeatureVector([
            self.gender.code(),
            f64::from(self.age),
            self.sleep_duration,
            f64::from(sleep_quality_score),
            f64::from(self.physical_activity),
            f64::from(self.stress_level),
            self.bmi.code(),
            f64::from(self.heart_rate),
            f64::from(self.daily_steps),
            f64::from(self.systolic_bp),
            f64::from(self.diastolic_bp),
        ])
    }
}

/// Ordered model input. Serializes as a plain JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// `(name, value)` pairs, for logs and debugging.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}
