//! # featurefit Core
//!
//! Core types shared by every featurefit crate.
//!
//! - [`FeatureVector`] - ordered numeric row handed to a model
//! - [`RawInput`] - flat form values for one request
//! - [`Diagnostic`] - non-fatal notes surfaced to the caller
//! - [`ModelArtifact`] - the opaque trained model boundary
//! - [`Error`] - the reconciliation error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use featurefit_core::{RawInput, RawValue};
//!
//! let input = RawInput::new()
//!     .with("Years_Coding", 5)
//!     .with("Country", "India")
//!     .with("Codes_In_Python", true);
//!
//! assert_eq!(input.get("Country"), Some(&RawValue::Category("India".into())));
//! ```

pub mod artifact;
pub mod diagnostic;
pub mod error;
pub mod input;
pub mod vector;

pub use artifact::{BackendError, ModelArtifact};
pub use diagnostic::{Diagnostic, DiagnosticCode};
pub use error::{Audience, Error, ErrorKind, Result};
pub use input::{RawInput, RawValue};
pub use vector::FeatureVector;
