//! Reconciliation configuration
//!
//! Describes what a column name means. A trained artifact only ever exposes
//! flat names like `Country_India`; the configuration says which prefixes
//! are one-hot groups, which columns are 0/1 flags, and how each group
//! copes with a category it has never seen.

use crate::schema::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// How to read a model's column names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaConfig {
    /// Separator between group and category in a one-hot column name
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Categorical groups, keyed by the name of the form field that selects them
    #[serde(default)]
    pub groups: Vec<GroupConfig>,

    /// Column names that are standalone 0/1 indicators
    #[serde(default)]
    pub binary_features: BTreeSet<String>,

    /// Label to value tables for numeric features chosen from a list
    #[serde(default)]
    pub ordinal_maps: BTreeMap<String, BTreeMap<String, f64>>,
}

fn default_delimiter() -> String {
    "_".to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            groups: Vec::new(),
            binary_features: BTreeSet::new(),
            ordinal_maps: BTreeMap::new(),
        }
    }
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_group(mut self, group: GroupConfig) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_binary(mut self, name: impl Into<String>) -> Self {
        self.binary_features.insert(name.into());
        self
    }

    pub fn with_ordinal<I, S>(mut self, feature: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let table = labels.into_iter().map(|(l, v)| (l.into(), v)).collect();
        self.ordinal_maps.insert(feature.into(), table);
        self
    }

    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let config: SchemaConfig = serde_json::from_str(json)
            .map_err(|e| SchemaError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SchemaError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Reject configurations that would classify a column ambiguously
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.delimiter.is_empty() {
            return Err(SchemaError::InvalidConfig("delimiter cannot be empty".into()));
        }

        let mut seen = BTreeSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(SchemaError::InvalidConfig("group name cannot be empty".into()));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(SchemaError::InvalidConfig(format!(
                    "group '{}' is declared twice",
                    group.name
                )));
            }
            if let (Some(fallback), Some(reference)) = (&group.fallback, &group.reference) {
                if fallback == reference {
                    return Err(SchemaError::InvalidConfig(format!(
                        "group '{}' uses '{}' as both fallback and reference",
                        group.name, fallback
                    )));
                }
            }
        }

        // `Country` and `Country_Code` would both claim `Country_Code_X`
        for a in &self.groups {
            for b in &self.groups {
                if a.name != b.name && self.prefix_of(&b.name).starts_with(&self.prefix_of(&a.name)) {
                    return Err(SchemaError::InvalidConfig(format!(
                        "group '{}' overlaps group '{}'",
                        a.name, b.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Column-name prefix shared by every member of `group`
    pub fn prefix_of(&self, group: &str) -> String {
        format!("{}{}", group, self.delimiter)
    }
}

/// One categorical variable and its unseen-category policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GroupConfig {
    pub name: String,

    /// Catch-all category. Only honoured when the trained schema actually
    /// contains the matching column.
    #[serde(default)]
    pub fallback: Option<String>,

    /// Category dropped by drop-first encoding; all members zero encodes it
    #[serde(default)]
    pub reference: Option<String>,

    /// UI label to trained category
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, category: impl Into<String>) -> Self {
        self.fallback = Some(category.into());
        self
    }

    pub fn with_reference(mut self, category: impl Into<String>) -> Self {
        self.reference = Some(category.into());
        self
    }

    pub fn with_alias(mut self, label: impl Into<String>, category: impl Into<String>) -> Self {
        self.aliases.insert(label.into(), category.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = SchemaConfig::from_json_str("{}").unwrap();
        assert_eq!(config.delimiter, "_");
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "groups": [
                {"name": "Country", "fallback": "Other",
                 "aliases": {"United States of America": "US"}}
            ],
            "binary_features": ["Codes_In_Python", "Codes_In_SQL"],
            "ordinal_maps": {"Education": {"HS": 0, "BS": 1, "MS": 2, "PHD": 3}}
        }"#;
        let config = SchemaConfig::from_json_str(json).unwrap();

        let country = config.group("Country").unwrap();
        assert_eq!(country.fallback.as_deref(), Some("Other"));
        assert_eq!(country.aliases["United States of America"], "US");
        assert!(config.binary_features.contains("Codes_In_SQL"));
        assert_eq!(config.ordinal_maps["Education"]["MS"], 2.0);
    }

    #[test]
    fn test_overlapping_groups_rejected() {
        let config = SchemaConfig::new()
            .with_group(GroupConfig::new("Country"))
            .with_group(GroupConfig::new("Country_Code"));
        assert!(matches!(config.validate(), Err(SchemaError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_and_empty_rejected() {
        let dup = SchemaConfig::new()
            .with_group(GroupConfig::new("Country"))
            .with_group(GroupConfig::new("Country"));
        assert!(dup.validate().is_err());

        let empty = SchemaConfig::new().with_delimiter("");
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_fallback_equal_to_reference_rejected() {
        let config = SchemaConfig::new()
            .with_group(GroupConfig::new("Country").with_fallback("Other").with_reference("Other"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"delimiter": "=", "binary_features": ["Student"]}"#).unwrap();

        let config = SchemaConfig::from_path(&path).unwrap();
        assert_eq!(config.delimiter, "=");

        let missing = SchemaConfig::from_path(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(SchemaError::InvalidConfig(_))));
    }
}
