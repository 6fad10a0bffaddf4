//! Input vector builder
//!
//! Turns a schema and one request's raw form values into the feature vector
//! the model expects. Column order always comes from the schema; the raw
//! input is only ever looked up by name, never iterated to place values.

use crate::encoder::CategoricalEncoder;
use crate::schema::{FeatureSpec, Schema};
use featurefit_core::{Diagnostic, Error, FeatureVector, RawInput, RawValue, Result};
use std::collections::BTreeSet;

/// Vector plus the diagnostics collected while building it
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltVector {
    pub vector: FeatureVector,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuiltVector {
    pub fn is_degraded(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_degrading)
    }
}

/// Builds feature vectors against one schema
#[derive(Debug, Clone, Copy)]
pub struct InputVectorBuilder<'s> {
    schema: &'s Schema,
}

impl<'s> InputVectorBuilder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Build the vector for one request
    ///
    /// Every column starts at zero. Scalar columns named in `input` are
    /// coerced and written; each categorical group whose field is present is
    /// encoded through [`CategoricalEncoder`]. Columns nobody wrote stay zero.
    pub fn build(&self, input: &RawInput) -> Result<BuiltVector> {
        let mut vector = FeatureVector::zeros(self.schema.len());
        let mut diagnostics = Vec::new();

        for (index, spec) in self.schema.features().iter().enumerate() {
            let value = match spec {
                FeatureSpec::Numeric { name } => match input.get(name) {
                    Some(raw) => self.coerce_numeric(name, raw)?,
                    None => continue,
                },
                FeatureSpec::Binary { name } => match input.get(name) {
                    Some(raw) => coerce_binary(name, raw)?,
                    None => continue,
                },
                FeatureSpec::OneHotMember { .. } => continue,
            };
            vector.as_mut_slice()[index] = value;
        }

        for group in self.schema.groups() {
            let Some(raw) = input.get(group.name()) else {
                continue;
            };
            let selection = category_of(group.name(), raw)?;
            let encoding = CategoricalEncoder::encode(group, &selection)?;
            for assignment in &encoding.assignments {
                vector.as_mut_slice()[assignment.index] = assignment.value;
            }
            diagnostics.extend(encoding.diagnostic);
        }

        // Sorted so the diagnostics do not depend on the input's own key order
        let unused: BTreeSet<&str> = input
            .field_names()
            .filter(|field| !self.consumes(field))
            .collect();
        diagnostics.extend(unused.into_iter().map(|field| Diagnostic::UnusedInputField {
            field: field.to_string(),
        }));

        Ok(BuiltVector { vector, diagnostics })
    }

    fn consumes(&self, field: &str) -> bool {
        match self.schema.position(field).and_then(|i| self.schema.feature(i)) {
            Some(FeatureSpec::Numeric { .. }) | Some(FeatureSpec::Binary { .. }) => true,
            _ => self.schema.group(field).is_some(),
        }
    }

    fn coerce_numeric(&self, field: &str, raw: &RawValue) -> Result<f64> {
        match raw {
            RawValue::Number(n) => finite(field, *n),
            RawValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            RawValue::Category(label) => {
                if let Some(value) = self.schema.ordinal_value(field, label) {
                    return Ok(value);
                }
                match label.trim().parse::<f64>() {
                    Ok(n) => finite(field, n),
                    Err(_) => Err(Error::feature_type(
                        field,
                        match self.schema.ordinal_labels(field) {
                            Some(table) => format!(
                                "'{}' is not one of {:?}",
                                label,
                                table.keys().collect::<Vec<_>>()
                            ),
                            None => format!("expected a number, got \"{}\"", label),
                        },
                    )),
                }
            }
        }
    }
}

fn finite(field: &str, n: f64) -> Result<f64> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(Error::feature_type(field, format!("{} is not a finite number", n)))
    }
}

fn coerce_binary(field: &str, raw: &RawValue) -> Result<f64> {
    match raw {
        RawValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        RawValue::Number(n) if *n == 0.0 || *n == 1.0 => Ok(*n),
        RawValue::Number(n) => Err(Error::feature_type(
            field,
            format!("binary feature expects 0 or 1, got {}", n),
        )),
        RawValue::Category(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(1.0),
            "0" | "false" | "no" => Ok(0.0),
            _ => Err(Error::feature_type(
                field,
                format!("binary feature expects yes/no, got \"{}\"", s),
            )),
        },
    }
}

/// Category label for a group selection; integral numbers name tiers like `2`
/// Integral f64 values below 2^53 convert to i64 without loss
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

fn category_of(group: &str, raw: &RawValue) -> Result<String> {
    match raw {
        RawValue::Category(s) => Ok(s.clone()),
        RawValue::Number(n) if n.fract() == 0.0 && n.abs() < EXACT_INTEGER_LIMIT => {
            Ok(format!("{}", *n as i64))
        }
        RawValue::Number(n) => Ok(n.to_string()),
        RawValue::Bool(_) => Err(Error::feature_type(
            group,
            "expected a category selection, got a boolean",
        )),
    }
}
