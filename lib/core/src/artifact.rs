//! The boundary to a trained model
//!
//! A model artifact is opaque: this workspace never loads, trains or
//! serializes one. It only asks the artifact to predict a single row and,
//! where the artifact can answer, what columns it was trained on.

/// Failure reported by a prediction backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A loaded, trained regression model
///
/// Only [`predict`](ModelArtifact::predict) is required. The metadata
/// methods mirror what common model formats expose and default to `None`.
pub trait ModelArtifact: Send + Sync {
    /// Predict one row. `features` is in schema order.
    fn predict(&self, features: &[f64]) -> Result<f64, BackendError>;

    /// Ordered column names seen at training time
    fn feature_names(&self) -> Option<Vec<String>> {
        None
    }

    /// Number of columns seen at training time
    fn feature_count(&self) -> Option<usize> {
        None
    }

    /// Per-column importances aligned with `feature_names`
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// Short description for logs
    fn describe(&self) -> String {
        "opaque model".to_string()
    }
}
