//! Field predicates.

use regex::Regex;

use crate::domain::{Field, FieldValue, Record};

/// How a field value is tested.
#[derive(Debug, Clone)]
pub enum FilterKind {
    /// Equal to the given value.
    Exact(FieldValue<'static>),
    /// Boolean flag equal to the given value.
    BooleanEquals(bool),
    /// Text matching a case-insensitive regular expression anywhere.
    CaseInsensitiveMatch(Regex),
    /// Equal to any of the given values.
    OneOf(Vec<FieldValue<'static>>),
    /// Greater than or equal to the given value.
    AtLeast(FieldValue<'static>),
    /// Less than or equal to the given value.
    AtMost(FieldValue<'static>),
}

impl FilterKind {
    /// Test one value. A null value never matches.
    pub fn matches(&self, value: &FieldValue<'_>) -> bool {
        if value.is_null() {
            return false;
        }
        match self {
            FilterKind::Exact(expected) => value == expected,
            FilterKind::BooleanEquals(expected) => *value == FieldValue::Bool(*expected),
            FilterKind::CaseInsensitiveMatch(pattern) => match value {
                FieldValue::Text(text) => pattern.is_match(text),
                _ => false,
            },
            FilterKind::OneOf(candidates) => candidates.iter().any(|c| value == c),
            FilterKind::AtLeast(bound) => value >= bound,
            FilterKind::AtMost(bound) => value <= bound,
        }
    }
}

/// A predicate on one field of a record.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: Field,
    pub kind: FilterKind,
}

impl FieldFilter {
    pub fn new(field: Field, kind: FilterKind) -> Self {
        Self { field, kind }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.kind.matches(&record.value(self.field))
    }
}
