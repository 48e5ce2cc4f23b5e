//! Survival prediction for single passengers

use std::sync::Arc;

use crate::features::{FeatureEncoder, FeatureRow};
use crate::model::LinearModel;
use crate::{FeatureConfig, PassengerRecord, PredictionResult, Result};

/// Encodes a passenger, evaluates the model and shapes the result.
///
/// Cheap to clone: the model is shared read-only between clones.
#[derive(Debug, Clone)]
pub struct Predictor {
    encoder: FeatureEncoder,
    model: Arc<LinearModel>,
}

impl Predictor {
    /// Create a new predictor
    pub fn new(model: LinearModel, encoder: FeatureEncoder) -> Self {
        Predictor {
            encoder,
            model: Arc::new(model),
        }
    }

    /// Load predictor from saved model
    pub fn load(model_path: &str, features: &FeatureConfig) -> Result<Self> {
        let model = LinearModel::load(model_path)?;
        Ok(Self::new(model, FeatureEncoder::from_config(features)))
    }

    /// Predict a single passenger
    pub fn predict(&self, record: &PassengerRecord) -> PredictionResult {
        let row = self.encoder.encode(record);
        let result = PredictionResult::from_score(self.model.evaluate(&row));
        log::debug!(
            "{}: predicted_value={:.4} survived={}",
            record.name,
            result.predicted_value,
            result.survived
        );
        result
    }

    /// Encoded row for a passenger, as the model sees it
    pub fn features(&self, record: &PassengerRecord) -> FeatureRow {
        self.encoder.encode(record)
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

/// Format a prediction for display
pub fn format_prediction(record: &PassengerRecord, pred: &PredictionResult) -> String {
    let outcome = if pred.is_survivor() {
        "Survived"
    } else {
        "Did not survive"
    };

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {}
├─────────────────────────────────────────────────┤
│  Class / Sex:      {} / {}
│  Prediction:       {} ({})
│  Model output:     {:.4}
└─────────────────────────────────────────────────┘
"#,
        record.name, record.pclass, record.sex, outcome, pred.survived, pred.predicted_value
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        // Pclass, Age, SibSp, Parch, Fare, Sex_male, Embarked_Q, Embarked_S, Mr, Mrs, Miss
        LinearModel::new(
            [-0.16, -0.006, -0.05, -0.02, 0.0004, -0.3, 0.02, -0.04, -0.25, 0.05, 0.02],
            1.25,
        )
    }

    fn predictor() -> Predictor {
        Predictor::new(model(), FeatureEncoder::new())
    }

    fn mrs_smith() -> PassengerRecord {
        PassengerRecord {
            pclass: 1,
            name: "Smith, Mrs. Jane".to_string(),
            sex: "female".to_string(),
            age: Some(25.0),
            sibsp: 0,
            parch: 0,
            fare: Some(80.0),
            embarked: Some("C".to_string()),
        }
    }

    #[test]
    fn test_predict_reference_passenger() {
        let p = predictor();
        let record = mrs_smith();
        let result = p.predict(&record);

        let row = p.features(&record);
        assert_eq!(row.title_mrs, 1.0);
        assert_eq!(row.sex_male, 0.0);

        // 1.25 - 0.16 - 0.15 + 0.032 + 0.05
        assert!((result.predicted_value - 1.022).abs() < 1e-9);
        assert_eq!(result.survived, 1);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let p = predictor();
        let record = mrs_smith();

        assert_eq!(p.predict(&record), p.predict(&record));
    }

    #[test]
    fn test_survived_is_rounded_score() {
        let p = predictor();
        let mut record = mrs_smith();
        for (age, fare) in [(2.0, 500.0), (80.0, 0.0), (30.0, 7.25), (45.0, 3000.0)] {
            record.age = Some(age);
            record.fare = Some(fare);
            let result = p.predict(&record);
            assert_eq!(result.survived, result.predicted_value.round_ties_even() as i64);
        }
    }

    #[test]
    fn test_extreme_scores_are_not_clamped() {
        let p = predictor();
        let mut record = mrs_smith();
        record.fare = Some(10_000.0);
        let result = p.predict(&record);

        assert!(result.predicted_value > 4.0);
        assert!(result.survived > 1);
    }

    #[test]
    fn test_out_of_range_class_is_accepted() {
        let p = predictor();
        let mut record = mrs_smith();
        record.pclass = 5;
        let result = p.predict(&record);

        assert_eq!(p.features(&record).pclass, 5.0);
        assert!(result.predicted_value < p.predict(&mrs_smith()).predicted_value);
    }

    #[test]
    fn test_missing_optionals_still_predict() {
        let p = predictor();
        let record = PassengerRecord {
            pclass: 3,
            name: "Doe, Mr. John".to_string(),
            sex: "male".to_string(),
            age: None,
            sibsp: 0,
            parch: 0,
            fare: None,
            embarked: None,
        };
        let row = p.features(&record);

        assert_eq!(row.age, 0.0);
        assert_eq!(row.fare, 0.0);
        assert_eq!(row.embarked_s, 1.0);
        assert_eq!(row.title_mr, 1.0);
        assert!(p.predict(&record).predicted_value.is_finite());
    }

    #[test]
    fn test_clones_share_model() {
        let p = predictor();
        let q = p.clone();

        assert!(std::ptr::eq(p.model(), q.model()));
    }

    #[test]
    fn test_format_prediction() {
        let record = mrs_smith();
        let text = format_prediction(&record, &PredictionResult::from_score(0.91));

        assert!(text.contains("Smith, Mrs. Jane"));
        assert!(text.contains("Survived (1)"));
        assert!(text.contains("0.9100"));
    }
}
