//! # featurefit Inference
//!
//! The back half of a prediction request: gate the reconciled vector, call
//! the model, and shape the outcome.
//!
//! ```text
//! SchemaLoading ──> SchemaReady ──┬──> Building ──> Validated(Ready | Degraded) ──> Predicted
//!       │                         │        │                   │                        │
//!       └──> SchemaUnavailable    │        └──> Failed         └──> Fatal               └──> Failed
//!                                 └── one schema, many requests
//! ```
//!
//! [`Session`] wires the stages together; each stage is also usable alone.

pub mod band;
pub mod invoker;
pub mod outcome;
pub mod session;
pub mod validator;

pub use band::SalaryBand;
pub use invoker::{InferenceInvoker, Prediction};
pub use outcome::{ColumnValue, ErrorBody, PredictionResult, ReconcileResult};
pub use session::Session;
pub use validator::{ReconciliationValidator, Status, ValidatedVector, ValidationOutcome};
