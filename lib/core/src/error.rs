use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Model schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error("Model reports {feature_count} features but no feature names; refusing to guess a schema")]
    SchemaUnderspecified { feature_count: usize },

    #[error("Field '{field}' has an unusable value: {reason}")]
    FeatureTypeError { field: String, reason: String },

    #[error("Category '{category}' cannot be mapped onto group '{group}'")]
    UnmappableCategory { group: String, category: String },

    #[error("Prediction backend failed on a {vector_len}-feature vector{}: {message}", expectation_suffix(.expected_features, .detail))]
    PredictionBackendError {
        message: String,
        vector_len: usize,
        expected_features: Option<usize>,
        detail: Option<String>,
    },

    #[error("Reconciliation invariant violated: {0}")]
    Fatal(String),
}

fn expectation_suffix(expected: &Option<usize>, detail: &Option<String>) -> String {
    match (expected, detail) {
        (Some(n), Some(d)) => format!(" (backend expects {n}; {d})"),
        (Some(n), None) => format!(" (backend expects {n})"),
        (None, Some(d)) => format!(" ({d})"),
        (None, None) => String::new(),
    }
}

impl Error {
    pub fn feature_type(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::FeatureTypeError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SchemaUnavailable(_) => ErrorKind::SchemaUnavailable,
            Error::SchemaUnderspecified { .. } => ErrorKind::SchemaUnderspecified,
            Error::FeatureTypeError { .. } => ErrorKind::FeatureTypeError,
            Error::UnmappableCategory { .. } => ErrorKind::UnmappableCategory,
            Error::PredictionBackendError { .. } => ErrorKind::PredictionBackendError,
            Error::Fatal(_) => ErrorKind::Fatal,
        }
    }
}

/// Machine-readable error classification exposed at the result boundary
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    SchemaUnavailable,
    SchemaUnderspecified,
    FeatureTypeError,
    UnmappableCategory,
    PredictionBackendError,
    Fatal,
}

/// Who can act on an error
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// The person filling the form can fix it by changing a selection
    EndUser,
    /// Only whoever deploys the model artifact can fix it
    Operator,
}

impl ErrorKind {
    pub fn audience(self) -> Audience {
        match self {
            ErrorKind::FeatureTypeError | ErrorKind::UnmappableCategory => Audience::EndUser,
            ErrorKind::SchemaUnavailable
            | ErrorKind::SchemaUnderspecified
            | ErrorKind::PredictionBackendError
            | ErrorKind::Fatal => Audience::Operator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_split() {
        assert_eq!(ErrorKind::UnmappableCategory.audience(), Audience::EndUser);
        assert_eq!(ErrorKind::FeatureTypeError.audience(), Audience::EndUser);
        assert_eq!(ErrorKind::SchemaUnderspecified.audience(), Audience::Operator);
        assert_eq!(ErrorKind::PredictionBackendError.audience(), Audience::Operator);
    }

    #[test]
    fn test_backend_error_message_carries_shape() {
        let err = Error::PredictionBackendError {
            message: "shape mismatch".to_string(),
            vector_len: 11,
            expected_features: Some(42),
            detail: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("11-feature"));
        assert!(msg.contains("backend expects 42"));
        assert!(msg.contains("shape mismatch"));
    }

    #[test]
    fn test_kind_serializes_as_variant_name() {
        let json = serde_json::to_string(&ErrorKind::UnmappableCategory).unwrap();
        assert_eq!(json, "\"UnmappableCategory\"");
    }
}
