//! Labelled passenger data for training
//!
//! Reads the Kaggle `train.csv` layout or a JSON array of the same records.

use std::path::Path;

use serde::Deserialize;

use crate::{LabelledPassenger, PassengerRecord, Result, TitanicError};

/// Labelled passengers kept in file order
#[derive(Debug, Clone, Default)]
pub struct PassengerDataset {
    samples: Vec<LabelledPassenger>,
}

/// One row of the Kaggle training file. Other columns (PassengerId, Ticket,
/// Cabin) are ignored; empty Age, Fare and Embarked cells read as missing.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Survived")]
    survived: u8,
    #[serde(rename = "Pclass")]
    pclass: i64,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Age", default)]
    age: Option<f64>,
    #[serde(rename = "SibSp")]
    sibsp: i64,
    #[serde(rename = "Parch")]
    parch: i64,
    #[serde(rename = "Fare", default)]
    fare: Option<f64>,
    #[serde(rename = "Embarked", default)]
    embarked: Option<String>,
}

impl From<CsvRow> for LabelledPassenger {
    fn from(row: CsvRow) -> Self {
        LabelledPassenger {
            passenger: PassengerRecord {
                pclass: row.pclass,
                name: row.name,
                sex: row.sex,
                age: row.age,
                sibsp: row.sibsp,
                parch: row.parch,
                fare: row.fare,
                embarked: row.embarked,
            },
            survived: row.survived,
        }
    }
}

impl PassengerDataset {
    pub fn new(samples: Vec<LabelledPassenger>) -> Self {
        PassengerDataset { samples }
    }

    /// Load labelled passengers; `.csv` files are read as Kaggle CSV, anything
    /// else as a JSON array
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TitanicError::Training(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let dataset = if is_csv {
            Self::from_csv(content.as_bytes())?
        } else {
            Self::from_json(&content)?
        };

        log::info!("Loaded {} passengers from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let samples: Vec<LabelledPassenger> = serde_json::from_str(content)?;
        Self::checked(samples)
    }

    /// Parse CSV with a header row
    pub fn from_csv<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let samples = reader
            .deserialize::<CsvRow>()
            .map(|row| row.map(LabelledPassenger::from))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::checked(samples)
    }

    fn checked(samples: Vec<LabelledPassenger>) -> Result<Self> {
        if let Some(bad) = samples.iter().find(|s| s.survived > 1) {
            return Err(TitanicError::Parse(format!(
                "Survived must be 0 or 1, got {} for {}",
                bad.survived, bad.passenger.name
            )));
        }
        Ok(Self::new(samples))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Passenger records without labels
    pub fn records(&self) -> Vec<PassengerRecord> {
        self.samples.iter().map(|s| s.passenger.clone()).collect()
    }

    /// Labels as regression targets
    pub fn targets(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.survived as f64).collect()
    }

    /// Observed survival rate
    pub fn survival_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.targets().iter().sum::<f64>() / self.samples.len() as f64
    }
}
