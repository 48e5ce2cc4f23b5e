//! Survival model
//!
//! A linear regressor over the feature schema, persisted with burn's record
//! format and evaluated on the CPU.

pub mod linear;

pub use linear::{LinearModel, ModelBackend, SurvivalRegressor};
