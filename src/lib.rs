//! # featurefit
//!
//! Feature-schema reconciliation for tabular regression models.
//!
//! A trained salary model expects an exact, ordered set of columns:
//! scalars, skill flags and one-hot country indicators. A form produces a
//! country name, an education tier, a number of years and a few checkboxes.
//! featurefit turns the second into the first, and refuses loudly when it
//! cannot do so faithfully.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! featurefit --artifact model.json --config schema.json serve --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use featurefit::prelude::*;
//! use featurefit::artifact::LinearArtifact;
//! use std::sync::Arc;
//!
//! let model = LinearArtifact::new(vec![2500.0, -8000.0, 1200.0], 42000.0).with_feature_names(vec![
//!     "Years_Coding".to_string(),
//!     "Country_India".to_string(),
//!     "Country_Other".to_string(),
//! ]);
//! let config = SchemaConfig::new().with_group(GroupConfig::new("Country").with_fallback("Other"));
//! let session = Session::load(Arc::new(model), None, config).unwrap();
//!
//! let result = session.predict(&RawInput::new().with("Years_Coding", 4).with("Country", "Germany"));
//! assert_eq!(result.status, Status::Degraded);
//! assert_eq!(result.prediction, Some(53200.0));
//! ```
//!
//! ## Crate Structure
//!
//! - `featurefit-core` - vectors, raw input, diagnostics, errors, the model boundary
//! - `featurefit-schema` - schema extraction, categorical encoding, vector building
//! - `featurefit-inference` - validation gate, prediction, result shape
//! - `featurefit-api` - REST API

pub mod artifact;

// Re-export core types
pub use featurefit_core::{
    Audience, BackendError, Diagnostic, DiagnosticCode, Error, ErrorKind, FeatureVector,
    ModelArtifact, RawInput, RawValue, Result,
};

// Re-export schema
pub use featurefit_schema::{
    CategoricalEncoder, CategoricalGroup, ColumnReport, FeatureSpec, GroupConfig,
    InputVectorBuilder, Schema, SchemaConfig, SchemaError, SchemaExtractor,
};

// Re-export inference
pub use featurefit_inference::{
    ColumnValue, InferenceInvoker, PredictionResult, ReconcileResult, ReconciliationValidator,
    SalaryBand, Session, Status, ValidationOutcome,
};

// Re-export API
pub use featurefit_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Diagnostic, Error, ErrorKind, FeatureSpec, FeatureVector, GroupConfig, InputVectorBuilder,
        ModelArtifact, PredictionResult, RawInput, RawValue, Result, Schema, SchemaConfig,
        SchemaExtractor, Session, Status,
    };
}
