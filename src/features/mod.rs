//! Feature extraction and encoding
//!
//! Converts raw passenger records into model-ready rows.

pub mod encoding;
pub mod schema;
pub mod title;

pub use encoding::FeatureEncoder;
pub use schema::{FeatureRow, FEATURE_NAMES};
