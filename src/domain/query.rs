//! Filter-operator query translation.
//!
//! Listing endpoints accept arbitrary `field=value` pairs where a value may
//! carry a textual operator tag, e.g. `?initial_date={gteq}2024-01-01`. This
//! module turns such a map into a flat conjunction of typed predicates.
//!
//! Lenient by contract: an unrecognized operator tag drops the field from the
//! predicate tree without raising an error, and a value that merely looks
//! like an operator (`{unbalanced`) is kept as a literal equality match.
//! Callers rely on these semantics; do not tighten them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static OPERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{(\w+)\}(.*)$").expect("operator pattern is valid"));

/// Comparison operator attached to a single predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    /// Case-insensitive substring match
    Like,
}

impl FilterOperator {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "neq" => Some(Self::Neq),
            "gt" => Some(Self::Gt),
            "gteq" => Some(Self::Gteq),
            "lt" => Some(Self::Lt),
            "lteq" => Some(Self::Lteq),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

/// A single field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl Predicate {
    /// Evaluate the predicate against a field value. Comparisons are plain
    /// string ordering; ISO-8601 dates order correctly under it.
    pub fn matches(&self, actual: &str) -> bool {
        match self.operator {
            FilterOperator::Eq => actual == self.value,
            FilterOperator::Neq => actual != self.value,
            FilterOperator::Gt => actual > self.value.as_str(),
            FilterOperator::Gteq => actual >= self.value.as_str(),
            FilterOperator::Lt => actual < self.value.as_str(),
            FilterOperator::Lteq => actual <= self.value.as_str(),
            FilterOperator::Like => actual.to_lowercase().contains(&self.value.to_lowercase()),
        }
    }
}

/// Flat conjunction of predicates; the empty tree matches every record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateTree {
    pub predicates: Vec<Predicate>,
}

impl PredicateTree {
    /// Translate a string-keyed filter map into a predicate tree.
    ///
    /// A plain value means equality. A `{op}literal` value becomes a typed
    /// comparison. An unknown operator tag omits the field entirely, and a
    /// value the operator pattern cannot parse falls back to equality on the
    /// raw string.
    pub fn from_filters(filters: &BTreeMap<String, String>) -> Self {
        let mut predicates = Vec::new();

        for (field, value) in filters {
            if value.starts_with('{') {
                if let Some(caps) = OPERATOR_RE.captures(value) {
                    let tag = &caps[1];
                    match FilterOperator::from_tag(tag) {
                        Some(operator) => predicates.push(Predicate {
                            field: field.clone(),
                            operator,
                            value: caps[2].to_string(),
                        }),
                        // Unknown operator: drop the field, never an error.
                        None => continue,
                    }
                } else {
                    predicates.push(Predicate {
                        field: field.clone(),
                        operator: FilterOperator::Eq,
                        value: value.clone(),
                    });
                }
            } else {
                predicates.push(Predicate {
                    field: field.clone(),
                    operator: FilterOperator::Eq,
                    value: value.clone(),
                });
            }
        }

        Self { predicates }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluate the conjunction against a record exposed as a field lookup.
    /// A predicate on a field the record does not expose fails the match.
    pub fn matches<'a, F>(&self, field_value: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.predicates
            .iter()
            .all(|p| field_value(&p.field).is_some_and(|v| p.matches(v)))
    }
}
