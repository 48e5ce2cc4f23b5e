//! Fixed feature schema the model is trained and served on

use std::collections::HashMap;

/// Column names in the order the model's coefficients are laid out
pub const FEATURE_NAMES: [&str; FeatureRow::DIM] = [
    "Pclass",
    "Age",
    "SibSp",
    "Parch",
    "Fare",
    "Sex_male",
    "Embarked_Q",
    "Embarked_S",
    "Title_Mr",
    "Title_Mrs",
    "Title_Miss",
];

/// One encoded passenger, every schema column present
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureRow {
    pub pclass: f64,
    pub age: f64,
    pub sibsp: f64,
    pub parch: f64,
    pub fare: f64,
    pub sex_male: f64,
    pub embarked_q: f64,
    pub embarked_s: f64,
    pub title_mr: f64,
    pub title_mrs: f64,
    pub title_miss: f64,
}

/// Result of reconciling an expanded column set against the schema
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub row: FeatureRow,
    /// Emitted columns that are not part of the schema (reference fallbacks)
    pub dropped: Vec<String>,
    /// Schema columns that were not emitted and were synthesized as 0.0
    pub synthesized: Vec<&'static str>,
}

impl FeatureRow {
    pub const DIM: usize = 11;

    /// Build a row from whatever columns an expansion produced.
    ///
    /// Schema columns missing from `columns` become 0.0; columns outside the
    /// schema are dropped and reported.
    pub fn reconcile(columns: &HashMap<String, f64>) -> Reconciled {
        let mut values = [0.0; Self::DIM];
        let mut synthesized = Vec::new();

        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            match columns.get(name) {
                Some(v) => *slot = *v,
                None => synthesized.push(name),
            }
        }

        let mut dropped: Vec<String> = columns
            .keys()
            .filter(|k| !FEATURE_NAMES.iter().any(|n| *n == k.as_str()))
            .cloned()
            .collect();
        dropped.sort();

        Reconciled {
            row: Self::from_array(values),
            dropped,
            synthesized,
        }
    }

    pub fn from_array(v: [f64; Self::DIM]) -> Self {
        FeatureRow {
            pclass: v[0],
            age: v[1],
            sibsp: v[2],
            parch: v[3],
            fare: v[4],
            sex_male: v[5],
            embarked_q: v[6],
            embarked_s: v[7],
            title_mr: v[8],
            title_mrs: v[9],
            title_miss: v[10],
        }
    }

    /// Values in schema order
    pub fn to_array(&self) -> [f64; Self::DIM] {
        [
            self.pclass,
            self.age,
            self.sibsp,
            self.parch,
            self.fare,
            self.sex_male,
            self.embarked_q,
            self.embarked_s,
            self.title_mr,
            self.title_mrs,
            self.title_miss,
        ]
    }

    /// (name, value) pairs in schema order
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_empty_synthesizes_all() {
        let r = FeatureRow::reconcile(&HashMap::new());

        assert_eq!(r.row, FeatureRow::default());
        assert_eq!(r.synthesized.len(), FeatureRow::DIM);
        assert!(r.dropped.is_empty());
    }

    #[test]
    fn test_reconcile_drops_out_of_schema_columns() {
        let mut columns = HashMap::new();
        columns.insert("Pclass".to_string(), 2.0);
        columns.insert("Embarked_Q".to_string(), 1.0);
        columns.insert("Title_Dr".to_string(), 1.0);
        columns.insert("Sex_other".to_string(), 1.0);

        let r = FeatureRow::reconcile(&columns);

        assert_eq!(r.row.pclass, 2.0);
        assert_eq!(r.row.embarked_q, 1.0);
        assert_eq!(r.row.title_mr + r.row.title_mrs + r.row.title_miss, 0.0);
        assert_eq!(r.dropped, vec!["Sex_other".to_string(), "Title_Dr".to_string()]);
        assert!(r.synthesized.contains(&"Age"));
        assert!(!r.synthesized.contains(&"Pclass"));
    }

    #[test]
    fn test_array_order_matches_names() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];
        let row = FeatureRow::from_array(values);

        assert_eq!(row.to_array(), values);
        let named = row.named();
        assert_eq!(named[0], ("Pclass", 1.0));
        assert_eq!(named[4], ("Fare", 5.0));
        assert_eq!(named[7], ("Embarked_S", 8.0));
        assert_eq!(named[10], ("Title_Miss", 11.0));
    }
}
