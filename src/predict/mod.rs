//! Prediction and inference
//!
//! Load a trained model and generate predictions.

pub mod inference;

pub use inference::Predictor;
