//! Result boundary
//!
//! The one shape every caller sees, whether the request predicted, predicted
//! with substitutions, or failed.

use crate::invoker::Prediction;
use crate::validator::{Status, ValidatedVector};
use featurefit_core::{Audience, Diagnostic, Error, ErrorKind};
use featurefit_schema::Schema;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub audience: Audience,
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        let kind = err.kind();
        Self {
            kind,
            audience: kind.audience(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionResult {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl PredictionResult {
    pub fn success(prediction: Prediction) -> Self {
        Self {
            status: if prediction.degraded {
                Status::Degraded
            } else {
                Status::Ready
            },
            prediction: Some(prediction.value),
            diagnostics: prediction.diagnostics,
            error: None,
        }
    }

    /// Failure, keeping any diagnostics gathered before it
    pub fn failure(err: &Error, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            status: Status::Failed,
            prediction: None,
            diagnostics,
            error: Some(ErrorBody::from(err)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != Status::Failed
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

/// One assembled column, as the model will receive it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnValue {
    pub name: String,
    pub value: f64,
}

/// The assembled input row, without a prediction
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReconcileResult {
    pub status: Status,
    pub columns: Vec<ColumnValue>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ReconcileResult {
    /// Pair each value of `validated` with its schema column name
    pub fn from_validated(schema: &Schema, validated: ValidatedVector) -> Self {
        let status = if validated.is_degraded() {
            Status::Degraded
        } else {
            Status::Ready
        };
        let (vector, diagnostics) = validated.into_parts();
        let columns = schema
            .features()
            .iter()
            .zip(vector.as_slice())
            .map(|(spec, &value)| ColumnValue {
                name: spec.name().to_string(),
                value,
            })
            .collect();

        Self {
            status,
            columns,
            diagnostics,
            error: None,
        }
    }

    pub fn failure(err: &Error) -> Self {
        Self {
            status: Status::Failed,
            columns: Vec::new(),
            diagnostics: Vec::new(),
            error: Some(ErrorBody::from(err)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status != Status::Failed
    }

    /// Columns set to a non-zero value
    pub fn active(&self) -> impl Iterator<Item = &ColumnValue> {
        self.columns.iter().filter(|c| c.value != 0.0)
    }
}
