//! Reconciliation session
//!
//! One loaded model and its extracted schema. Loading runs schema
//! extraction once; every request afterwards shares the schema read-only
//! and runs build, validate and predict without touching session state.

use crate::invoker::{InferenceInvoker, Prediction};
use crate::outcome::{PredictionResult, ReconcileResult};
use crate::validator::{ReconciliationValidator, ValidatedVector};
use featurefit_core::{Error, ModelArtifact, RawInput, Result};
use featurefit_schema::{InputVectorBuilder, Schema, SchemaConfig, SchemaExtractor};
use std::sync::Arc;

#[derive(Clone)]
pub struct Session {
    schema: Arc<Schema>,
    artifact: Arc<dyn ModelArtifact>,
}

impl Session {
    /// Extract the schema of `artifact` and keep both for later requests
    pub fn load(
        artifact: Arc<dyn ModelArtifact>,
        bundled: Option<&[String]>,
        config: SchemaConfig,
    ) -> Result<Self> {
        let schema = SchemaExtractor::new(config).extract(artifact.as_ref(), bundled)?;
        Ok(Self::with_schema(Arc::new(schema), artifact))
    }

    /// Pair an already extracted schema with its artifact
    pub fn with_schema(schema: Arc<Schema>, artifact: Arc<dyn ModelArtifact>) -> Self {
        Self { schema, artifact }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn artifact(&self) -> &Arc<dyn ModelArtifact> {
        &self.artifact
    }

    /// Build and validate without calling the model
    pub fn reconcile(&self, input: &RawInput) -> Result<ValidatedVector> {
        let built = InputVectorBuilder::new(&self.schema).build(input)?;
        ReconciliationValidator::validate(&self.schema, built).into_result()
    }

    /// The assembled row for `input`, named by column, without calling the model
    pub fn explain(&self, input: &RawInput) -> ReconcileResult {
        match self.reconcile(input) {
            Ok(validated) => ReconcileResult::from_validated(&self.schema, validated),
            Err(err) => {
                log_failure(&err);
                ReconcileResult::failure(&err)
            }
        }
    }

    pub fn try_predict(&self, input: &RawInput) -> Result<Prediction> {
        let validated = self.reconcile(input)?;
        InferenceInvoker::new(self.artifact.as_ref()).invoke(&self.schema, validated)
    }

    /// Full request: never panics, always returns the result boundary shape
    pub fn predict(&self, input: &RawInput) -> PredictionResult {
        let validated = match self.reconcile(input) {
            Ok(validated) => validated,
            Err(err) => {
                log_failure(&err);
                return PredictionResult::failure(&err, Vec::new());
            }
        };

        // A backend failure still reports what reconciliation substituted
        let diagnostics = validated.diagnostics().to_vec();
        match InferenceInvoker::new(self.artifact.as_ref()).invoke(&self.schema, validated) {
            Ok(prediction) => PredictionResult::success(prediction),
            Err(err) => {
                log_failure(&err);
                PredictionResult::failure(&err, diagnostics)
            }
        }
    }
}

fn log_failure(err: &Error) {
    match err {
        Error::FeatureTypeError { .. } | Error::UnmappableCategory { .. } => {
            tracing::debug!(error = %err, "request rejected")
        }
        _ => tracing::warn!(error = %err, kind = ?err.kind(), "request failed"),
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("features", &self.schema.len())
            .field("model", &self.artifact.describe())
            .finish()
    }
}
