//! Offline training of the survival regressor

use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::metrics::Metrics;
use super::ols::fit_least_squares;
use crate::data::PassengerDataset;
use crate::features::encoding::median;
use crate::features::{FeatureEncoder, FeatureRow};
use crate::model::{ModelBackend, SurvivalRegressor};
use crate::{Result, TitanicError, TrainingConfig};

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train: Metrics,
    pub test: Metrics,
    /// Median of the ages present in the dataset, used to fill missing ages
    pub median_age: Option<f64>,
}

/// Fits a linear regressor on labelled passengers
pub struct Trainer {
    config: TrainingConfig,
    encoder: FeatureEncoder,
    device: <ModelBackend as burn::tensor::backend::Backend>::Device,
}

impl Trainer {
    pub fn new(config: TrainingConfig, encoder: FeatureEncoder) -> Self {
        Trainer {
            config,
            encoder,
            device: Default::default(),
        }
    }

    /// Encode, split, fit and evaluate
    pub fn train(
        &self,
        dataset: &PassengerDataset,
    ) -> Result<(SurvivalRegressor<ModelBackend>, TrainingReport)> {
        if dataset.is_empty() {
            return Err(TitanicError::Training("dataset is empty".to_string()));
        }
        if !(0.0..1.0).contains(&self.config.test_fraction) {
            return Err(TitanicError::Training(format!(
                "test_fraction must be in [0, 1), got {}",
                self.config.test_fraction
            )));
        }

        // Missing ages take the median of the whole dataset, before splitting
        let records = dataset.records();
        let rows = self.encoder.encode_batch(&records);
        let targets = dataset.targets();
        let median_age = median(records.iter().filter_map(|r| r.age));

        let (train_idx, test_idx) = self.split(rows.len());
        log::info!(
            "Training on {} passengers, holding out {}",
            train_idx.len(),
            test_idx.len()
        );

        let (train_rows, train_targets) = select(&rows, &targets, &train_idx);
        let (test_rows, test_targets) = select(&rows, &targets, &test_idx);

        let fit = fit_least_squares(&train_rows, &train_targets)?;
        log::debug!("Fitted with design rank {}", fit.rank);
        let model =
            SurvivalRegressor::<ModelBackend>::from_parameters(&self.device, &fit.coefficients, fit.intercept);

        let train = Metrics::from_predictions(&self.predict(&model, &train_rows)?, &train_targets);
        let test = Metrics::from_predictions(&self.predict(&model, &test_rows)?, &test_targets);
        log::info!("Train {}", train);
        if test.total > 0 {
            log::info!("Test  {}", test);
        }

        Ok((
            model,
            TrainingReport {
                train,
                test,
                median_age,
            },
        ))
    }

    /// Shuffled train/test indices; at least one sample is kept for training
    pub fn split(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);

        let n_test = ((n as f64) * self.config.test_fraction).ceil() as usize;
        let n_test = n_test.min(n.saturating_sub(1));
        let train = indices.split_off(n_test);
        (train, indices)
    }

    fn predict(&self, model: &SurvivalRegressor<ModelBackend>, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let input = SurvivalRegressor::<ModelBackend>::rows_to_tensor(rows, &self.device);
        model
            .forward(input)
            .into_data()
            .convert::<f64>()
            .to_vec::<f64>()
            .map_err(|e| TitanicError::Training(format!("unreadable model output: {:?}", e)))
    }
}

fn select(rows: &[FeatureRow], targets: &[f64], idx: &[usize]) -> (Vec<FeatureRow>, Vec<f64>) {
    idx.iter().map(|&i| (rows[i], targets[i])).unzip()
}
