//! Titanic survival prediction
//!
//! Turns raw passenger attributes into a survival prediction using a linear
//! model trained on the fixed eleven-column feature schema.

pub mod api;
pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod training;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Embarkation code used when a record does not carry one
pub const DEFAULT_EMBARKED: &str = "S";

/// Raw passenger attributes as received from the request boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRecord {
    /// Ticket class, nominally 1-3 (not range checked)
    #[serde(rename = "Pclass", deserialize_with = "integral")]
    pub pclass: i64,
    /// Full name, e.g. "Braund, Mr. Owen Harris"
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
    /// Siblings and spouses aboard
    #[serde(rename = "SibSp", deserialize_with = "integral")]
    pub sibsp: i64,
    /// Parents and children aboard
    #[serde(rename = "Parch", deserialize_with = "integral")]
    pub parch: i64,
    #[serde(rename = "Fare", default = "default_fare")]
    pub fare: Option<f64>,
    #[serde(rename = "Embarked", default = "default_embarked")]
    pub embarked: Option<String>,
}

/// Integer field that also accepts a float with no fractional part (`1.0`)
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        Number::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Number::Float(f) => Err(serde::de::Error::custom(format!(
            "expected an integer, got {}",
            f
        ))),
    }
}

fn default_fare() -> Option<f64> {
    Some(0.0)
}

fn default_embarked() -> Option<String> {
    Some(DEFAULT_EMBARKED.to_string())
}

/// A passenger record with its known outcome, used for training
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelledPassenger {
    #[serde(flatten)]
    pub passenger: PassengerRecord,
    #[serde(rename = "Survived")]
    pub survived: u8,
}

/// Model prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Rounded model output. Usually 0 or 1, but extreme inputs can push a
    /// linear model outside that range and the value is kept as-is.
    pub survived: i64,
    /// Raw continuous model output before rounding
    pub predicted_value: f64,
}

impl PredictionResult {
    /// Shape a raw model score into a result
    ///
    /// Rounds half to even, matching the rounding the model was validated with.
    pub fn from_score(score: f64) -> Self {
        PredictionResult {
            survived: score.round_ties_even() as i64,
            predicted_value: score,
        }
    }

    pub fn is_survivor(&self) -> bool {
        self.survived >= 1
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum TitanicError {
    #[error("Model not found at {0} - run `titanic train` first")]
    NoModel(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Model shape mismatch: expected {expected}, found {found}")]
    ModelShape { expected: String, found: String },

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, TitanicError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Artifact path without the `.mpk` extension burn appends
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            path: "model/titanic_model".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Age substituted when a batch has no ages to take a median from.
    /// Left unset, such rows are encoded with Age = 0.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_age: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Labelled passengers, Kaggle `train.csv` or a JSON array
    pub data_path: String,
    /// Share of samples held out for evaluation
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            data_path: "data/train.csv".to_string(),
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TitanicError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| TitanicError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TitanicError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_for_missing_optionals() {
        let json = r#"{"Pclass":3,"Name":"Doe, Mr. John","Sex":"male","SibSp":0,"Parch":0}"#;
        let record: PassengerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.age, None);
        assert_eq!(record.fare, Some(0.0));
        assert_eq!(record.embarked.as_deref(), Some("S"));
    }

    #[test]
    fn test_record_explicit_nulls_stay_absent() {
        let json = r#"{"Pclass":1,"Name":"A, Mrs. B","Sex":"female","Age":null,
            "SibSp":1,"Parch":0,"Fare":null,"Embarked":null}"#;
        let record: PassengerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.age, None);
        assert_eq!(record.fare, None);
        assert_eq!(record.embarked, None);
    }

    #[test]
    fn test_record_rejects_missing_required_field() {
        let json = r#"{"Pclass":1,"Sex":"female","SibSp":0,"Parch":0}"#;
        assert!(serde_json::from_str::<PassengerRecord>(json).is_err());
    }

    #[test]
    fn test_record_accepts_integral_floats() {
        let json = r#"{"Pclass":1.0,"Name":"Doe, Mr. John","Sex":"male","SibSp":2.0,"Parch":0}"#;
        let record: PassengerRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.pclass, 1);
        assert_eq!(record.sibsp, 2);
    }

    #[test]
    fn test_record_rejects_fractional_class() {
        let json = r#"{"Pclass":1.5,"Name":"Doe, Mr. John","Sex":"male","SibSp":0,"Parch":0}"#;
        assert!(serde_json::from_str::<PassengerRecord>(json).is_err());

        let json = r#"{"Pclass":"1","Name":"Doe, Mr. John","Sex":"male","SibSp":0,"Parch":0}"#;
        assert!(serde_json::from_str::<PassengerRecord>(json).is_err());
    }

    #[test]
    fn test_labelled_passenger_ignores_extra_columns() {
        let json = r#"{"PassengerId":1,"Survived":0,"Pclass":3,
            "Name":"Braund, Mr. Owen Harris","Sex":"male","Age":22.0,"SibSp":1,
            "Parch":0,"Ticket":"A/5 21171","Fare":7.25,"Cabin":null,"Embarked":"S"}"#;
        let sample: LabelledPassenger = serde_json::from_str(json).unwrap();

        assert_eq!(sample.survived, 0);
        assert_eq!(sample.passenger.age, Some(22.0));
        assert_eq!(sample.passenger.sibsp, 1);
    }

    #[test]
    fn test_prediction_rounding_is_not_clamped() {
        assert_eq!(PredictionResult::from_score(0.49).survived, 0);
        assert_eq!(PredictionResult::from_score(0.51).survived, 1);
        assert_eq!(PredictionResult::from_score(1.7).survived, 2);
        assert_eq!(PredictionResult::from_score(-0.8).survived, -1);
    }

    #[test]
    fn test_prediction_rounds_ties_to_even() {
        assert_eq!(PredictionResult::from_score(0.5).survived, 0);
        assert_eq!(PredictionResult::from_score(1.5).survived, 2);
        assert_eq!(PredictionResult::from_score(-0.5).survived, 0);
    }

    #[test]
    fn test_config_roundtrip_defaults() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.model.path, "model/titanic_model");
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.features.fallback_age, None);
        assert!((parsed.training.test_fraction - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_partial_file() {
        let parsed: Config = toml::from_str("[features]\nfallback_age = 28.0\n").unwrap();
        assert_eq!(parsed.features.fallback_age, Some(28.0));
        assert_eq!(parsed.training.seed, 42);
    }
}
