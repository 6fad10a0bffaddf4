use serde::Serialize;
use std::fmt;

/// Non-fatal notes produced while reconciling an input
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "code")]
pub enum Diagnostic {
    /// An unknown category was routed to the group's catch-all member
    FallbackApplied {
        group: String,
        requested: String,
        applied: String,
    },
    /// An unknown category was encoded as the implicit drop-first reference
    ReferenceCategoryAssumed { group: String, requested: String },
    /// An input field matched no feature or group
    UnusedInputField { field: String },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    FallbackApplied,
    ReferenceCategoryAssumed,
    UnusedInputField,
}

impl Diagnostic {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Diagnostic::FallbackApplied { .. } => DiagnosticCode::FallbackApplied,
            Diagnostic::ReferenceCategoryAssumed { .. } => DiagnosticCode::ReferenceCategoryAssumed,
            Diagnostic::UnusedInputField { .. } => DiagnosticCode::UnusedInputField,
        }
    }

    /// Whether the prediction was computed from something other than what
    /// the user selected
    pub fn is_degrading(&self) -> bool {
        matches!(
            self,
            Diagnostic::FallbackApplied { .. } | Diagnostic::ReferenceCategoryAssumed { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FallbackApplied {
                group,
                requested,
                applied,
            } => write!(
                f,
                "{group}: '{requested}' is not a trained category, using '{applied}' instead"
            ),
            Diagnostic::ReferenceCategoryAssumed { group, requested } => write!(
                f,
                "{group}: '{requested}' is not a trained category, encoded as the reference category"
            ),
            Diagnostic::UnusedInputField { field } => {
                write!(f, "input field '{field}' is not used by the model")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrading_codes() {
        let fallback = Diagnostic::FallbackApplied {
            group: "Country".into(),
            requested: "Germany".into(),
            applied: "Other".into(),
        };
        let unused = Diagnostic::UnusedInputField { field: "Age".into() };

        assert!(fallback.is_degrading());
        assert!(!unused.is_degrading());
        assert_eq!(fallback.code(), DiagnosticCode::FallbackApplied);
    }

    #[test]
    fn test_serialized_with_code_tag() {
        let diag = Diagnostic::ReferenceCategoryAssumed {
            group: "Country".into(),
            requested: "Peru".into(),
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["code"], "ReferenceCategoryAssumed");
        assert_eq!(json["group"], "Country");
    }
}
