//! Prediction invocation
//!
//! Calls the opaque model on a validated vector. The call is blocking and
//! has no deadline of its own; callers that need one wrap the invocation.

use crate::validator::ValidatedVector;
use featurefit_core::{Diagnostic, Error, ModelArtifact, Result};
use featurefit_schema::{ColumnReport, Schema};

/// Successful prediction with everything noted on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub value: f64,
    pub diagnostics: Vec<Diagnostic>,
    pub degraded: bool,
}

pub struct InferenceInvoker<'a> {
    artifact: &'a dyn ModelArtifact,
}

impl<'a> InferenceInvoker<'a> {
    pub fn new(artifact: &'a dyn ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn invoke(&self, schema: &Schema, validated: ValidatedVector) -> Result<Prediction> {
        let degraded = validated.is_degraded();
        let (vector, diagnostics) = validated.into_parts();

        let outcome = self.artifact.predict(vector.as_slice());
        let value = match outcome {
            Ok(v) if v.is_finite() => v,
            Ok(v) => return Err(self.backend_error(schema, vector.len(), format!("model returned {}", v))),
            Err(e) => return Err(self.backend_error(schema, vector.len(), e.message)),
        };

        tracing::debug!(prediction = value, degraded, "prediction complete");
        Ok(Prediction {
            value,
            diagnostics,
            degraded,
        })
    }

    /// Attach whatever the backend can say about its own expectations
    fn backend_error(&self, schema: &Schema, vector_len: usize, message: String) -> Error {
        let names = self.artifact.feature_names();
        let expected_features = self
            .artifact
            .feature_count()
            .or_else(|| names.as_ref().map(Vec::len));
        let detail = names
            .map(|n| ColumnReport::compare(schema, n.as_slice()))
            .filter(|report| !report.is_exact())
            .map(|report| report.to_string());

        tracing::warn!(
            model = %self.artifact.describe(),
            vector_len,
            ?expected_features,
            %message,
            "prediction backend failed"
        );

        Error::PredictionBackendError {
            message,
            vector_len,
            expected_features,
            detail,
        }
    }
}
