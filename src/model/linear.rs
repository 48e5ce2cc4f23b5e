//! Linear survival regressor
//!
//! The model is persisted as a burn `Linear` layer (weight `[11, 1]`, bias
//! `[1]`). For serving it is flattened into a plain [`LinearModel`] that can be
//! shared across threads without locking.

use burn::backend::NdArray;
use burn::module::{Module, Param};
use burn::nn::{Linear, LinearConfig};
use burn::record::{DoublePrecisionSettings, NamedMpkFileRecorder, Recorder};
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use crate::features::FeatureRow;
use crate::{Result, TitanicError};

/// CPU backend used to read and write model artifacts
pub type ModelBackend = NdArray<f64>;

/// File burn writes for an artifact path
pub fn artifact_file(path: &str) -> String {
    format!("{}.mpk", path)
}

/// Linear regression over the feature schema
#[derive(Module, Debug)]
pub struct SurvivalRegressor<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> SurvivalRegressor<B> {
    /// Create an untrained regressor over the feature schema
    pub fn new(device: &B::Device) -> Self {
        SurvivalRegressor {
            linear: LinearConfig::new(FeatureRow::DIM, 1).init(device),
        }
    }

    /// Create a regressor with fitted parameters
    pub fn from_parameters(
        device: &B::Device,
        coefficients: &[f64; FeatureRow::DIM],
        intercept: f64,
    ) -> Self {
        let weight = Tensor::<B, 2>::from_data(
            TensorData::new(coefficients.to_vec(), [FeatureRow::DIM, 1]),
            device,
        );
        let bias = Tensor::<B, 1>::from_data(TensorData::new(vec![intercept], [1]), device);

        let mut linear = LinearConfig::new(FeatureRow::DIM, 1).init(device);
        linear.weight = Param::from_tensor(weight);
        linear.bias = Some(Param::from_tensor(bias));

        SurvivalRegressor { linear }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `features` - Feature rows in schema order [batch, 11]
    ///
    /// # Returns
    /// Raw regression output [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Stack feature rows into a [batch, 11] tensor
    pub fn rows_to_tensor(rows: &[FeatureRow], device: &B::Device) -> Tensor<B, 2> {
        let data: Vec<f64> = rows.iter().flat_map(|r| r.to_array()).collect();
        Tensor::<B, 2>::from_data(TensorData::new(data, [rows.len(), FeatureRow::DIM]), device)
    }

    /// Flatten into coefficients and intercept, checking the layer shape
    pub fn to_linear_model(&self) -> Result<LinearModel> {
        let weight = self.linear.weight.val();
        let dims = weight.dims();
        if dims != [FeatureRow::DIM, 1] {
            return Err(TitanicError::ModelShape {
                expected: format!("weight [{}, 1]", FeatureRow::DIM),
                found: format!("weight {:?}", dims),
            });
        }

        let bias = self.linear.bias.as_ref().ok_or_else(|| TitanicError::ModelShape {
            expected: "bias [1]".to_string(),
            found: "no bias".to_string(),
        })?;
        let bias = bias.val();
        if bias.dims() != [1] {
            return Err(TitanicError::ModelShape {
                expected: "bias [1]".to_string(),
                found: format!("bias {:?}", bias.dims()),
            });
        }

        let weights = tensor_values(weight.into_data())?;
        let intercept = tensor_values(bias.into_data())?[0];

        let mut coefficients = [0.0; FeatureRow::DIM];
        coefficients.copy_from_slice(&weights);
        Ok(LinearModel::new(coefficients, intercept))
    }

    /// Save model to file
    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let recorder = NamedMpkFileRecorder::<DoublePrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| TitanicError::Io(std::io::Error::other(e.to_string())))
    }

    /// Load model from file
    pub fn load(device: &B::Device, path: &str) -> Result<Self> {
        let file = artifact_file(path);
        if !std::path::Path::new(&file).exists() {
            return Err(TitanicError::NoModel(file));
        }

        let recorder = NamedMpkFileRecorder::<DoublePrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| TitanicError::ModelLoad(format!("{}: {}", file, e)))?;

        Ok(Self::new(device).load_record(record))
    }
}

fn tensor_values(data: TensorData) -> Result<Vec<f64>> {
    data.convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| TitanicError::ModelLoad(format!("unreadable tensor data: {:?}", e)))
}

/// Coefficients and intercept of a loaded model, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: [f64; FeatureRow::DIM],
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: [f64; FeatureRow::DIM], intercept: f64) -> Self {
        LinearModel {
            coefficients,
            intercept,
        }
    }

    /// Read an artifact written by [`SurvivalRegressor::save`]
    pub fn load(path: &str) -> Result<Self> {
        let device = Default::default();
        let model = SurvivalRegressor::<ModelBackend>::load(&device, path)?.to_linear_model()?;
        log::info!("Loaded model from {}", artifact_file(path));
        Ok(model)
    }

    /// Model output for one row: coefficients · row + intercept
    pub fn evaluate(&self, row: &FeatureRow) -> f64 {
        self.coefficients
            .iter()
            .zip(row.to_array())
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept
    }

    pub fn coefficients(&self) -> &[f64; FeatureRow::DIM] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}
