//! # featurefit Schema
//!
//! Feature-schema reconciliation: turning a handful of form selections into
//! the exact column vector a trained model expects.
//!
//! ## Overview
//!
//! A trained tabular model knows its inputs only as flat column names
//! (`Years_Coding`, `Codes_In_SQL`, `Country_India`, ...). A form knows a
//! few human choices (a country, a tier, some checkboxes). This crate
//! bridges the two:
//!
//! 1. [`SchemaExtractor`] recovers the ordered [`Schema`] from the artifact
//! 2. [`InputVectorBuilder`] fills a vector in schema order
//! 3. [`CategoricalEncoder`] maps each selection onto its one-hot columns,
//!    applying a schema-confirmed fallback or drop-first reference when the
//!    selection was never seen in training
//!
//! ## Example
//!
//! ```rust
//! use featurefit_schema::{FeatureSpec, GroupConfig, InputVectorBuilder, Schema, SchemaConfig};
//! use featurefit_core::RawInput;
//!
//! let config = SchemaConfig::new()
//!     .with_group(GroupConfig::new("Country").with_fallback("Other"));
//! let schema = Schema::with_config(
//!     vec![
//!         FeatureSpec::numeric("Years_Coding"),
//!         FeatureSpec::one_hot("Country", "India"),
//!         FeatureSpec::one_hot("Country", "Other"),
//!     ],
//!     &config,
//! )
//! .unwrap();
//!
//! let input = RawInput::new().with("Years_Coding", 5).with("Country", "Germany");
//! let built = InputVectorBuilder::new(&schema).build(&input).unwrap();
//!
//! assert_eq!(built.vector.as_slice(), &[5.0, 0.0, 1.0]);
//! assert!(built.is_degraded());
//! ```

pub mod builder;
pub mod config;
pub mod encoder;
pub mod extractor;
pub mod report;
pub mod schema;

// Re-export main types
pub use builder::{BuiltVector, InputVectorBuilder};
pub use config::{GroupConfig, SchemaConfig};
pub use encoder::{Assignment, CategoricalEncoder, Encoding};
pub use extractor::SchemaExtractor;
pub use report::ColumnReport;
pub use schema::{CategoricalGroup, FeatureSpec, GroupMember, Schema, SchemaError};
