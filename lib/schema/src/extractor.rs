//! Schema extraction
//!
//! Recovers the ordered column set from whatever a loaded artifact exposes.
//! Artifacts differ: some carry their training column names, some only a
//! column count, some nothing. A count without names is refused outright;
//! naming columns by guesswork yields vectors of the right length holding
//! values in the wrong places.

use crate::config::SchemaConfig;
use crate::schema::{FeatureSpec, Schema, SchemaError};
use featurefit_core::{Error, ModelArtifact, Result};

#[derive(Debug, Clone, Default)]
pub struct SchemaExtractor {
    config: SchemaConfig,
}

impl SchemaExtractor {
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Derive the schema of `artifact`
    ///
    /// Names reported by the artifact itself take precedence over a
    /// `bundled` column list shipped alongside it. When the artifact also
    /// reports a feature count, it must agree with the name list.
    pub fn extract(&self, artifact: &dyn ModelArtifact, bundled: Option<&[String]>) -> Result<Schema> {
        self.config.validate()?;

        let own = artifact.feature_names().filter(|n| !n.is_empty());
        let bundled = bundled.filter(|n| !n.is_empty());

        let names: Option<Vec<String>> = match (own, bundled) {
            (Some(own), Some(bundled)) => {
                if own.as_slice() != bundled {
                    tracing::warn!(
                        model_columns = own.len(),
                        bundled_columns = bundled.len(),
                        "bundled column list disagrees with the model; using the model's own names"
                    );
                }
                Some(own)
            }
            (Some(own), None) => Some(own),
            (None, Some(bundled)) => Some(bundled.to_vec()),
            (None, None) => None,
        };

        match (names, artifact.feature_count()) {
            (Some(names), Some(count)) if names.len() != count => Err(SchemaError::CountMismatch {
                names: names.len(),
                count,
            }
            .into()),
            (Some(names), _) => {
                let schema = self.parse_names(names.as_slice())?;
                tracing::info!(
                    model = %artifact.describe(),
                    features = schema.len(),
                    groups = schema.groups().len(),
                    "schema extracted"
                );
                Ok(schema)
            }
            (None, Some(count)) if count > 0 => Err(Error::SchemaUnderspecified { feature_count: count }),
            (None, _) => Err(Error::SchemaUnavailable(
                "model exposes neither feature names nor a feature count".to_string(),
            )),
        }
    }

    /// Build a schema from an ordered list of column names
    pub fn parse_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Schema> {
        let features = names.iter().map(|n| self.classify(n.as_ref())).collect();
        Ok(Schema::with_config(features, &self.config)?)
    }

    /// Classify one column name
    ///
    /// `{group}{delimiter}{category}` for a configured group is a one-hot
    /// member; configured binary names are binary; everything else is numeric.
    pub fn classify(&self, name: &str) -> FeatureSpec {
        for group in &self.config.groups {
            let prefix = self.config.prefix_of(&group.name);
            if let Some(category) = name.strip_prefix(prefix.as_str()) {
                if !category.is_empty() {
                    return FeatureSpec::OneHotMember {
                        group: group.name.clone(),
                        category: category.to_string(),
                        name: name.to_string(),
                    };
                }
            }
        }

        if self.config.binary_features.contains(name) {
            FeatureSpec::binary(name)
        } else {
            FeatureSpec::numeric(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupConfig;
    use featurefit_core::BackendError;

    #[derive(Default)]
    struct StubArtifact {
        names: Option<Vec<String>>,
        count: Option<usize>,
    }

    impl ModelArtifact for StubArtifact {
        fn predict(&self, _features: &[f64]) -> std::result::Result<f64, BackendError> {
            Ok(0.0)
        }

        fn feature_names(&self) -> Option<Vec<String>> {
            self.names.clone()
        }

        fn feature_count(&self) -> Option<usize> {
            self.count
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn extractor() -> SchemaExtractor {
        SchemaExtractor::new(
            SchemaConfig::new()
                .with_group(GroupConfig::new("Country").with_fallback("Other"))
                .with_binary("Codes_In_Python"),
        )
    }

    #[test]
    fn test_classify() {
        let ex = extractor();
        assert_eq!(
            ex.classify("Country_India"),
            FeatureSpec::OneHotMember {
                group: "Country".into(),
                category: "India".into(),
                name: "Country_India".into(),
            }
        );
        assert_eq!(ex.classify("Codes_In_Python"), FeatureSpec::binary("Codes_In_Python"));
        assert_eq!(ex.classify("Years_Coding"), FeatureSpec::numeric("Years_Coding"));
        // Bare prefix is not a member
        assert_eq!(ex.classify("Country_"), FeatureSpec::numeric("Country_"));
    }

    #[test]
    fn test_extract_from_model_names() {
        let artifact = StubArtifact {
            names: Some(names(&["Years_Coding", "Codes_In_Python", "Country_India", "Country_Other"])),
            count: Some(4),
        };
        let schema = extractor().extract(&artifact, None).unwrap();

        assert_eq!(schema.len(), 4);
        assert_eq!(schema.group("Country").unwrap().fallback().unwrap().category, "Other");
    }

    #[test]
    fn test_extract_from_bundled_names() {
        let artifact = StubArtifact::default();
        let bundled = names(&["Years_Coding", "Country_India"]);
        let schema = extractor().extract(&artifact, Some(bundled.as_slice())).unwrap();
        assert_eq!(schema.names(), vec!["Years_Coding", "Country_India"]);
    }

    #[test]
    fn test_model_names_win_over_bundled() {
        let artifact = StubArtifact {
            names: Some(names(&["Years_Coding"])),
            count: None,
        };
        let bundled = names(&["Age", "Years_Coding"]);
        let schema = extractor().extract(&artifact, Some(bundled.as_slice())).unwrap();
        assert_eq!(schema.names(), vec!["Years_Coding"]);
    }

    #[test]
    fn test_count_only_is_underspecified() {
        let artifact = StubArtifact {
            names: None,
            count: Some(42),
        };
        let err = extractor().extract(&artifact, None).unwrap_err();
        assert_eq!(err, Error::SchemaUnderspecified { feature_count: 42 });
    }

    #[test]
    fn test_nothing_is_unavailable() {
        let err = extractor().extract(&StubArtifact::default(), None).unwrap_err();
        assert!(matches!(err, Error::SchemaUnavailable(_)));

        let empty = StubArtifact {
            names: Some(vec![]),
            count: Some(0),
        };
        assert!(matches!(
            extractor().extract(&empty, None),
            Err(Error::SchemaUnavailable(_))
        ));
    }

    #[test]
    fn test_count_mismatch_is_never_truncated() {
        let artifact = StubArtifact {
            names: None,
            count: Some(2),
        };
        let bundled = names(&["Years_Coding", "Codes_In_Python", "Country_India"]);
        let err = extractor().extract(&artifact, Some(bundled.as_slice())).unwrap_err();

        match err {
            Error::SchemaUnavailable(msg) => assert!(msg.contains("3 entries")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_names_unavailable() {
        let artifact = StubArtifact {
            names: Some(names(&["Age", "Age"])),
            count: None,
        };
        assert!(matches!(
            extractor().extract(&artifact, None),
            Err(Error::SchemaUnavailable(_))
        ));
    }
}
