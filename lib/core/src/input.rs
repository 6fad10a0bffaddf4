//! Raw form input
//!
//! A flat mapping of field name to the value a form widget produced. The
//! mapping is owned by the caller for the duration of one request; nothing in
//! this workspace retains it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// One widget value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    /// Checkbox state
    Bool(bool),
    /// Slider or number input
    Number(f64),
    /// Select-box label, free-form
    Category(String),
}

impl RawValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "boolean",
            RawValue::Number(_) => "number",
            RawValue::Category(_) => "category",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Category(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(f64::from(n))
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Category(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Category(s)
    }
}

/// Field name to raw value, for a single prediction request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawInput {
    fields: HashMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in unspecified order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Convert a JSON object payload. `null` members are treated as absent.
    pub fn from_json(payload: &Value) -> Result<Self> {
        let object = payload.as_object().ok_or_else(|| {
            Error::feature_type("<input>", "expected a JSON object of field values")
        })?;

        let mut input = RawInput::new();
        for (field, value) in object {
            let raw = match value {
                Value::Null => continue,
                Value::Bool(b) => RawValue::Bool(*b),
                Value::Number(n) => match n.as_f64() {
                    Some(f) => RawValue::Number(f),
                    None => return Err(Error::feature_type(field, "number out of range")),
                },
                Value::String(s) => RawValue::Category(s.clone()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::feature_type(
                        field,
                        "expected a number, boolean or category string",
                    ))
                }
            };
            input.fields.insert(field.clone(), raw);
        }
        Ok(input)
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = RawInput::new();
        for (k, v) in iter {
            input.insert(k, v);
        }
        input
    }
}
