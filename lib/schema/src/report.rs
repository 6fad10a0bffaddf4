//! Column set comparison
//!
//! Describes how an externally assembled list of column names differs from
//! a schema: which columns are missing, which are unexpected, and whether
//! the columns both sides share appear in a different order.

use ahash::AHashSet;
use crate::schema::Schema;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ColumnReport {
    /// Schema columns absent from the compared list, in schema order
    pub missing: Vec<String>,
    /// Compared columns the schema does not know, in their own order
    pub unexpected: Vec<String>,
    /// Shared columns appear in a different relative order
    pub misordered: bool,
}

impl ColumnReport {
    pub fn compare<S: AsRef<str>>(schema: &Schema, columns: &[S]) -> Self {
        let given: AHashSet<&str> = columns.iter().map(|c| c.as_ref()).collect();

        let missing = schema
            .names()
            .into_iter()
            .filter(|name| !given.contains(name))
            .map(str::to_string)
            .collect();

        let unexpected = columns
            .iter()
            .map(|c| c.as_ref())
            .filter(|name: &&str| schema.position(name).is_none())
            .map(str::to_string)
            .collect();

        let shared_positions: Vec<usize> = columns
            .iter()
            .filter_map(|c| schema.position(c.as_ref()))
            .collect();
        let misordered = shared_positions.windows(2).any(|w| w[0] >= w[1]);

        Self {
            missing,
            unexpected,
            misordered,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && !self.misordered
    }
}

impl fmt::Display for ColumnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_exact() {
            return write!(f, "columns match");
        }
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing {:?}", self.missing));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected {:?}", self.unexpected));
        }
        if self.misordered {
            parts.push("shared columns out of order".to_string());
        }
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureSpec;

    fn schema() -> Schema {
        Schema::new(vec![
            FeatureSpec::numeric("Years_Coding"),
            FeatureSpec::binary("Codes_In_SQL"),
            FeatureSpec::one_hot("Country", "India"),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact() {
        let report = ColumnReport::compare(&schema(), &["Years_Coding", "Codes_In_SQL", "Country_India"]);
        assert!(report.is_exact());
        assert_eq!(report.to_string(), "columns match");
    }

    #[test]
    fn test_missing_and_unexpected() {
        let report = ColumnReport::compare(&schema(), &["Years_Coding", "Age"]);
        assert_eq!(report.missing, vec!["Codes_In_SQL", "Country_India"]);
        assert_eq!(report.unexpected, vec!["Age"]);
        assert!(!report.misordered);
    }

    #[test]
    fn test_same_set_wrong_order() {
        let report = ColumnReport::compare(&schema(), &["Country_India", "Years_Coding", "Codes_In_SQL"]);
        assert!(report.missing.is_empty());
        assert!(report.unexpected.is_empty());
        assert!(report.misordered);
        assert!(report.to_string().contains("out of order"));
    }
}
