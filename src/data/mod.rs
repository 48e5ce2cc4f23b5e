//! Training data loading

pub mod dataset;

pub use dataset::PassengerDataset;
