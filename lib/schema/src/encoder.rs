//! Categorical encoding
//!
//! Maps one selected category onto the indicator columns of its group.
//! Resolution order for a selection:
//!
//! 1. exact member match (after alias translation)
//! 2. the group's reference category, encoded as all zeros
//! 3. the schema-confirmed fallback member, with [`Diagnostic::FallbackApplied`]
//! 4. all zeros when drop-first encoding makes that legal, with
//!    [`Diagnostic::ReferenceCategoryAssumed`]
//! 5. otherwise [`Error::UnmappableCategory`]

use crate::schema::CategoricalGroup;
use featurefit_core::{Diagnostic, Error, Result};

/// One column write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub index: usize,
    pub value: f64,
}

/// Result of encoding one selection: a value for every member of the group
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding<'a> {
    pub assignments: Vec<Assignment<'a>>,
    pub diagnostic: Option<Diagnostic>,
}

impl Encoding<'_> {
    /// Member set to 1, if any
    pub fn hot(&self) -> Option<&str> {
        self.assignments.iter().find(|a| a.value == 1.0).map(|a| a.name)
    }
}

/// Stateless one-hot encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalEncoder;

impl CategoricalEncoder {
    pub fn encode<'a>(group: &'a CategoricalGroup, selection: &str) -> Result<Encoding<'a>> {
        let category = group.resolve_alias(selection);

        if let Some(member) = group.member(category) {
            return Ok(Self::one_hot(group, Some(member.index), None));
        }

        if group.reference() == Some(category) {
            return Ok(Self::one_hot(group, None, None));
        }

        if let Some(fallback) = group.fallback() {
            tracing::debug!(
                group = group.name(),
                requested = selection,
                applied = %fallback.category,
                "unknown category routed to fallback"
            );
            let diagnostic = Diagnostic::FallbackApplied {
                group: group.name().to_string(),
                requested: selection.to_string(),
                applied: fallback.category.clone(),
            };
            return Ok(Self::one_hot(group, Some(fallback.index), Some(diagnostic)));
        }

        if group.allows_all_zero() {
            tracing::debug!(
                group = group.name(),
                requested = selection,
                "unknown category encoded as reference"
            );
            let diagnostic = Diagnostic::ReferenceCategoryAssumed {
                group: group.name().to_string(),
                requested: selection.to_string(),
            };
            return Ok(Self::one_hot(group, None, Some(diagnostic)));
        }

        Err(Error::UnmappableCategory {
            group: group.name().to_string(),
            category: selection.to_string(),
        })
    }

    fn one_hot(group: &CategoricalGroup, hot: Option<usize>, diagnostic: Option<Diagnostic>) -> Encoding<'_> {
        let assignments = group
            .members()
            .iter()
            .map(|m| Assignment {
                name: &m.name,
                index: m.index,
                value: if Some(m.index) == hot { 1.0 } else { 0.0 },
            })
            .collect();
        Encoding {
            assignments,
            diagnostic,
        }
    }
}
