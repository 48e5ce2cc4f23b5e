//! Regression and classification metrics for a trained model

use std::fmt;

/// Metrics accumulated over a set of predictions
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Sum of squared errors of the raw output
    pub squared_error_sum: f64,
    /// Predictions whose rounded output equals the label
    pub correct: usize,
    pub total: usize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate from raw model outputs and 0/1 labels
    pub fn from_predictions(predicted: &[f64], targets: &[f64]) -> Self {
        let mut metrics = Self::new();
        for (&p, &y) in predicted.iter().zip(targets) {
            metrics.update(p, y);
        }
        metrics
    }

    pub fn update(&mut self, predicted: f64, target: f64) {
        self.squared_error_sum += (predicted - target).powi(2);
        if predicted.round_ties_even() == target {
            self.correct += 1;
        }
        self.total += 1;
    }

    /// Mean squared error
    pub fn mse(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.squared_error_sum / self.total as f64
        }
    }

    /// Share of rounded predictions matching the label
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MSE: {:.4}, Accuracy: {:.1}% ({}/{})",
            self.mse(),
            self.accuracy() * 100.0,
            self.correct,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let m = Metrics::from_predictions(&[0.2, 0.9, 0.6, -0.1], &[0.0, 1.0, 0.0, 0.0]);

        assert_eq!(m.total, 4);
        assert_eq!(m.correct, 3);
        let expected_mse = (0.04 + 0.01 + 0.36 + 0.01) / 4.0;
        assert!((m.mse() - expected_mse).abs() < 1e-12);
        assert!((m.accuracy() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_empty_metrics() {
        let m = Metrics::new();
        assert_eq!(m.mse(), 0.0);
        assert_eq!(m.accuracy(), 0.0);
    }

    #[test]
    fn test_display() {
        let m = Metrics::from_predictions(&[1.0], &[1.0]);
        assert_eq!(format!("{}", m), "MSE: 0.0000, Accuracy: 100.0% (1/1)");
    }
}
