//! JSON-described linear model
//!
//! A small stand-in for a real trained model, enough to drive the CLI and
//! the HTTP server end to end. It mirrors the shapes real artifacts come in:
//! with or without their own column names, with or without a bundled column
//! list next to them.
//!
//! ```json
//! {
//!   "feature_names": ["Years_Coding", "Country_India", "Country_Other"],
//!   "coefficients": [2500.0, -8000.0, 1200.0],
//!   "intercept": 42000.0,
//!   "columns": ["Years_Coding", "Country_India", "Country_Other"]
//! }
//! ```

use featurefit_core::{BackendError, ModelArtifact};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model has {names} feature names but {coefficients} coefficients")]
    Inconsistent { names: usize, coefficients: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearArtifact {
    /// Names the model reports for itself
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    /// Column count the model reports; defaults to the number of coefficients
    #[serde(default)]
    pub n_features: Option<usize>,

    pub coefficients: Vec<f64>,

    #[serde(default)]
    pub intercept: f64,

    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,

    /// Column list shipped alongside the model rather than inside it
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl LinearArtifact {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names: None,
            n_features: None,
            coefficients,
            intercept,
            feature_importances: None,
            columns: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let artifact: LinearArtifact = serde_json::from_str(json)?;
        if let Some(names) = &artifact.feature_names {
            if names.len() != artifact.coefficients.len() {
                return Err(ArtifactError::Inconsistent {
                    names: names.len(),
                    coefficients: artifact.coefficients.len(),
                });
            }
        }
        Ok(artifact)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The bundled column list, if one was shipped
    pub fn bundled_columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }
}

impl ModelArtifact for LinearArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, BackendError> {
        if features.len() != self.coefficients.len() {
            return Err(BackendError::new(format!(
                "X has {} features, but the model is expecting {} features as input",
                features.len(),
                self.coefficients.len()
            )));
        }
        let dot: f64 = features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum();
        Ok(self.intercept + dot)
    }

    fn feature_names(&self) -> Option<Vec<String>> {
        self.feature_names.clone()
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.n_features.unwrap_or(self.coefficients.len()))
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.feature_importances.clone()
    }

    fn describe(&self) -> String {
        format!("linear model ({} coefficients)", self.coefficients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict() {
        let model = LinearArtifact::new(vec![2.0, 3.0], 10.0);
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 15.0);
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_count_defaults_to_coefficients() {
        let model = LinearArtifact::new(vec![0.0; 42], 0.0);
        assert_eq!(model.feature_count(), Some(42));
        assert!(model.feature_names().is_none());
    }

    #[test]
    fn test_inconsistent_file_rejected() {
        let json = r#"{"feature_names": ["a", "b"], "coefficients": [1.0]}"#;
        assert!(matches!(
            LinearArtifact::from_json_str(json),
            Err(ArtifactError::Inconsistent { names: 2, coefficients: 1 })
        ));
    }
}
