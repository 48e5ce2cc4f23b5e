//! Passenger record to feature row encoding
//!
//! Imputes missing values, expands the categorical columns into indicators
//! against fixed reference categories, then reconciles the result against the
//! feature schema so every row has the same eleven columns no matter which
//! categories appeared in the batch.

use std::collections::HashMap;

use super::schema::{FeatureRow, Reconciled};
use super::title::title_of;
use crate::{FeatureConfig, PassengerRecord, DEFAULT_EMBARKED};

/// A categorical column and the value that is implied when all its
/// indicators are zero
#[derive(Debug, Clone, Copy)]
pub struct Categorical {
    pub prefix: &'static str,
    pub reference: &'static str,
}

pub const SEX: Categorical = Categorical {
    prefix: "Sex",
    reference: "female",
};

pub const EMBARKED: Categorical = Categorical {
    prefix: "Embarked",
    reference: "C",
};

/// Titles have no reference string: a missing title is the reference
pub const TITLE: &str = "Title";

impl Categorical {
    /// Indicator column for a value, `None` for the reference category
    pub fn column(&self, value: &str) -> Option<String> {
        if value == self.reference {
            None
        } else {
            Some(format!("{}_{}", self.prefix, value))
        }
    }
}

/// Median of the present values, `None` when there are none
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut v: Vec<f64> = values.into_iter().filter(|x| !x.is_nan()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;
    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) / 2.0)
    } else {
        Some(v[mid])
    }
}

/// Encodes passenger records into schema rows
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    fallback_age: Option<f64>,
}

impl FeatureEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FeatureConfig) -> Self {
        FeatureEncoder {
            fallback_age: config.fallback_age,
        }
    }

    /// Use a fixed age when a batch has no ages of its own
    pub fn with_fallback_age(mut self, age: f64) -> Self {
        self.fallback_age = Some(age);
        self
    }

    pub fn fallback_age(&self) -> Option<f64> {
        self.fallback_age
    }

    /// Encode a single record as a batch of one
    pub fn encode(&self, record: &PassengerRecord) -> FeatureRow {
        self.encode_row(record, self.batch_age(std::slice::from_ref(record)))
            .row
    }

    /// Encode a batch; missing ages take the median of the batch
    pub fn encode_batch(&self, records: &[PassengerRecord]) -> Vec<FeatureRow> {
        let fill_age = self.batch_age(records);
        records
            .iter()
            .map(|r| self.encode_row(r, fill_age).row)
            .collect()
    }

    /// Age substituted for records without one
    pub fn batch_age(&self, records: &[PassengerRecord]) -> Option<f64> {
        median(records.iter().filter_map(|r| r.age)).or(self.fallback_age)
    }

    /// Expand one record into its raw column set, before reconciliation
    pub fn expand(&self, record: &PassengerRecord, fill_age: Option<f64>) -> HashMap<String, f64> {
        let mut columns = HashMap::new();

        columns.insert("Pclass".to_string(), record.pclass as f64);
        // Left out entirely when nothing can fill it; reconciliation zeroes it
        if let Some(age) = record.age.or(fill_age) {
            columns.insert("Age".to_string(), age);
        }
        columns.insert("SibSp".to_string(), record.sibsp as f64);
        columns.insert("Parch".to_string(), record.parch as f64);
        columns.insert("Fare".to_string(), record.fare.unwrap_or(0.0));

        if let Some(col) = SEX.column(&record.sex) {
            columns.insert(col, 1.0);
        }

        let embarked = record.embarked.as_deref().unwrap_or(DEFAULT_EMBARKED);
        if let Some(col) = EMBARKED.column(embarked) {
            columns.insert(col, 1.0);
        }

        if let Some(title) = title_of(&record.name) {
            columns.insert(format!("{}_{}", TITLE, title), 1.0);
        }

        columns
    }

    /// Expand and reconcile one record
    pub fn encode_row(&self, record: &PassengerRecord, fill_age: Option<f64>) -> Reconciled {
        let reconciled = FeatureRow::reconcile(&self.expand(record, fill_age));
        if !reconciled.dropped.is_empty() {
            log::debug!(
                "{}: encoded as reference category for {:?}",
                record.name,
                reconciled.dropped
            );
        }
        reconciled
    }
}
