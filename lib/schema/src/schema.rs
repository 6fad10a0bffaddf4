//! Model feature schema
//!
//! The ordered column set a trained model expects. A schema is built once
//! per loaded artifact and never mutated afterwards; requests share it
//! read-only.

use crate::config::SchemaConfig;
use ahash::AHashMap;
use featurefit_core::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One column of a model's input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// Plain scalar (years of experience, an ordinal tier)
    Numeric { name: String },
    /// Standalone 0/1 flag (a skill checkbox)
    Binary { name: String },
    /// One indicator column of a one-hot encoded categorical variable
    OneHotMember {
        group: String,
        category: String,
        name: String,
    },
}

impl FeatureSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        FeatureSpec::Numeric { name: name.into() }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        FeatureSpec::Binary { name: name.into() }
    }

    /// Member whose column name is `{group}_{category}`
    pub fn one_hot(group: impl Into<String>, category: impl Into<String>) -> Self {
        let group = group.into();
        let category = category.into();
        let name = format!("{}_{}", group, category);
        FeatureSpec::OneHotMember {
            group,
            category,
            name,
        }
    }

    /// Column name as the model knows it
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Numeric { name }
            | FeatureSpec::Binary { name }
            | FeatureSpec::OneHotMember { name, .. } => name,
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            FeatureSpec::OneHotMember { group, .. } => Some(group),
            _ => None,
        }
    }
}

/// A one-hot column inside a [`CategoricalGroup`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupMember {
    pub category: String,
    pub name: String,
    /// Position in the schema
    pub index: usize,
}

/// All members of one categorical variable, plus its unseen-category policy
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalGroup {
    name: String,
    members: Vec<GroupMember>,
    fallback: Option<usize>,
    reference: Option<String>,
    aliases: BTreeMap<String, String>,
}

impl CategoricalGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in schema order
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    pub fn member(&self, category: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.category == category)
    }

    /// Catch-all member, present only if the trained schema has it
    pub fn fallback(&self) -> Option<&GroupMember> {
        self.fallback.map(|i| &self.members[i])
    }

    /// Category implied when every member is zero
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Whether an all-zero encoding is a legal state for this group
    pub fn allows_all_zero(&self) -> bool {
        self.reference.is_some()
    }

    /// Translate a UI label to the trained category name
    pub fn resolve_alias<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases.get(label).map(String::as_str).unwrap_or(label)
    }

    /// Every category a user may select without triggering a fallback
    pub fn choices(&self) -> Vec<&str> {
        let mut choices: Vec<&str> = self.members.iter().map(|m| m.category.as_str()).collect();
        if let Some(reference) = &self.reference {
            choices.push(reference);
        }
        choices
    }

    pub fn column_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(|m| m.index)
    }
}

/// Ordered, uniquely named columns of a trained model
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    features: Vec<FeatureSpec>,
    positions: AHashMap<String, usize>,
    groups: Vec<CategoricalGroup>,
    ordinals: AHashMap<String, BTreeMap<String, f64>>,
}

impl Schema {
    /// Build a schema with no fallbacks, references or ordinal tables
    pub fn new(features: Vec<FeatureSpec>) -> Result<Self, SchemaError> {
        Self::with_config(features, &SchemaConfig::default())
    }

    /// Build a schema, applying the group policies and ordinal tables in `config`
    pub fn with_config(features: Vec<FeatureSpec>, config: &SchemaConfig) -> Result<Self, SchemaError> {
        if features.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut positions = AHashMap::with_capacity(features.len());
        for (index, spec) in features.iter().enumerate() {
            if spec.name().is_empty() {
                return Err(SchemaError::EmptyName(index));
            }
            if positions.insert(spec.name().to_string(), index).is_some() {
                return Err(SchemaError::DuplicateFeature(spec.name().to_string()));
            }
        }

        // Groups appear in the order of their first member
        let mut groups: Vec<CategoricalGroup> = Vec::new();
        for (index, spec) in features.iter().enumerate() {
            if let FeatureSpec::OneHotMember { group, category, name } = spec {
                let member = GroupMember {
                    category: category.clone(),
                    name: name.clone(),
                    index,
                };
                match groups.iter_mut().find(|g| &g.name == group) {
                    Some(existing) => {
                        if existing.member(category).is_some() {
                            return Err(SchemaError::DuplicateCategory {
                                group: group.clone(),
                                category: category.clone(),
                            });
                        }
                        existing.members.push(member);
                    }
                    None => groups.push(CategoricalGroup {
                        name: group.clone(),
                        members: vec![member],
                        fallback: None,
                        reference: None,
                        aliases: BTreeMap::new(),
                    }),
                }
            }
        }

        for group in &mut groups {
            if positions.contains_key(&group.name) {
                return Err(SchemaError::AmbiguousField(group.name.clone()));
            }
            let Some(policy) = config.group(&group.name) else {
                continue;
            };

            if let Some(fallback) = &policy.fallback {
                group.fallback = group.members.iter().position(|m| &m.category == fallback);
                if group.fallback.is_none() {
                    tracing::debug!(
                        group = %group.name,
                        fallback = %fallback,
                        "configured fallback is not a trained column; ignoring it"
                    );
                }
            }
            if let Some(reference) = &policy.reference {
                if group.member(reference).is_some() {
                    return Err(SchemaError::InvalidConfig(format!(
                        "reference category '{}' of group '{}' has its own column",
                        reference, group.name
                    )));
                }
                group.reference = Some(reference.clone());
            }
            group.aliases = policy.aliases.clone();
        }

        let mut ordinals = AHashMap::new();
        for (feature, table) in &config.ordinal_maps {
            match positions.get(feature).map(|&i| &features[i]) {
                Some(FeatureSpec::Numeric { .. }) => {
                    ordinals.insert(feature.clone(), table.clone());
                }
                Some(_) => {
                    return Err(SchemaError::InvalidConfig(format!(
                        "ordinal table given for non-numeric feature '{}'",
                        feature
                    )))
                }
                None => {
                    tracing::debug!(feature = %feature, "ordinal table for a column the model does not have");
                }
            }
        }

        Ok(Self {
            features,
            positions,
            groups,
            ordinals,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    pub fn feature(&self, index: usize) -> Option<&FeatureSpec> {
        self.features.get(index)
    }

    /// Schema position of a column
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Column names in schema order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(FeatureSpec::name).collect()
    }

    pub fn groups(&self) -> &[CategoricalGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&CategoricalGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Value for `label` when `feature` is an ordinal numeric column
    pub fn ordinal_value(&self, feature: &str, label: &str) -> Option<f64> {
        self.ordinals.get(feature).and_then(|t| t.get(label)).copied()
    }

    pub fn ordinal_labels(&self, feature: &str) -> Option<&BTreeMap<String, f64>> {
        self.ordinals.get(feature)
    }
}

/// Errors raised while building a schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Feature at position {0} has an empty name")]
    EmptyName(usize),

    #[error("Feature '{0}' appears more than once")]
    DuplicateFeature(String),

    #[error("Category '{category}' appears twice in group '{group}'")]
    DuplicateCategory { group: String, category: String },

    #[error("'{0}' names both a feature and a categorical group")]
    AmbiguousField(String),

    #[error("Feature name list has {names} entries but the model reports {count} features")]
    CountMismatch { names: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Error::SchemaUnavailable(err.to_string())
    }
}
