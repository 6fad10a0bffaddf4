//! Reconciliation validator
//!
//! Last gate before a vector reaches the model. The builder already
//! guarantees everything checked here; a failure means the builder is
//! broken, not that the user typed something wrong.

use featurefit_core::{Diagnostic, Error, FeatureVector, Result};
use featurefit_schema::{BuiltVector, FeatureSpec, Schema};
use serde::Serialize;

/// Vector cleared for prediction
///
/// Only [`ReconciliationValidator`] creates these, so holding one proves the
/// checks ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedVector {
    vector: FeatureVector,
    diagnostics: Vec<Diagnostic>,
    degraded: bool,
}

impl ValidatedVector {
    pub fn vector(&self) -> &FeatureVector {
        &self.vector
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn into_parts(self) -> (FeatureVector, Vec<Diagnostic>) {
        (self.vector, self.diagnostics)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Status {
    Ready,
    Degraded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Safe to predict, input used as given
    Ready(ValidatedVector),
    /// Safe to predict, but a fallback or reference category stood in for
    /// the user's selection
    Degraded(ValidatedVector),
    /// Builder invariant broken; the model must not be called
    Fatal(String),
}

impl ValidationOutcome {
    pub fn status(&self) -> Status {
        match self {
            ValidationOutcome::Ready(_) => Status::Ready,
            ValidationOutcome::Degraded(_) => Status::Degraded,
            ValidationOutcome::Fatal(_) => Status::Failed,
        }
    }

    pub fn into_result(self) -> Result<ValidatedVector> {
        match self {
            ValidationOutcome::Ready(v) | ValidationOutcome::Degraded(v) => Ok(v),
            ValidationOutcome::Fatal(reason) => Err(Error::Fatal(reason)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationValidator;

impl ReconciliationValidator {
    pub fn validate(schema: &Schema, built: BuiltVector) -> ValidationOutcome {
        if let Err(reason) = Self::check(schema, &built.vector) {
            tracing::error!(%reason, "reconciled vector failed validation");
            return ValidationOutcome::Fatal(reason);
        }

        let degraded = built.is_degraded();
        let validated = ValidatedVector {
            vector: built.vector,
            diagnostics: built.diagnostics,
            degraded,
        };
        if degraded {
            ValidationOutcome::Degraded(validated)
        } else {
            ValidationOutcome::Ready(validated)
        }
    }

    fn check(schema: &Schema, vector: &FeatureVector) -> std::result::Result<(), String> {
        if vector.len() != schema.len() {
            return Err(format!(
                "vector has {} values but the schema has {} features",
                vector.len(),
                schema.len()
            ));
        }

        for (spec, value) in schema.features().iter().zip(vector.as_slice()) {
            if !value.is_finite() {
                return Err(format!("'{}' holds non-finite value {}", spec.name(), value));
            }
            let indicator = matches!(spec, FeatureSpec::Binary { .. } | FeatureSpec::OneHotMember { .. });
            if indicator && *value != 0.0 && *value != 1.0 {
                return Err(format!("indicator '{}' holds {}", spec.name(), value));
            }
        }

        for group in schema.groups() {
            let hot = group.column_indices().filter(|&i| vector[i] == 1.0).count();
            if hot > 1 {
                return Err(format!("group '{}' has {} members set", group.name(), hot));
            }
        }

        Ok(())
    }
}
