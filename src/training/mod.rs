//! Model training
//!
//! Closed-form least squares fit of the survival regressor on labelled
//! passengers, with a seeded hold-out split for evaluation.

pub mod metrics;
pub mod ols;
pub mod trainer;

pub use metrics::Metrics;
pub use trainer::{Trainer, TrainingReport};
