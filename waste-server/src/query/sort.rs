//! Multi-key sorting.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::{Field, Record};

use super::error::ValidationError;

/// Sort direction of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// One sort key: a field and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: Field,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
        }
    }

    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Descending,
        }
    }

    /// Compare two records on this key alone.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        let ordering = a.value(self.field).cmp(&b.value(self.field));
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "{}:desc", self.field),
        }
    }
}

/// Parse a `sort` value: comma-separated `field`, `field:asc` or
/// `field:desc`, earlier keys taking precedence.
///
/// Only syntax and field names are checked here; whether a field can be
/// sorted on depends on the record kind and is checked by the engine.
pub fn parse_sort(value: &str) -> Result<Vec<SortKey>, ValidationError> {
    let invalid = |reason: String| ValidationError::new("sort", value, reason);

    value
        .split(',')
        .map(|part| {
            let part = part.trim();
            let (name, direction) = match part.split_once(':') {
                Some((name, "asc")) => (name, Direction::Ascending),
                Some((name, "desc")) => (name, Direction::Descending),
                Some((_, other)) => {
                    return Err(invalid(format!(
                        "unknown direction '{other}', expected 'asc' or 'desc'"
                    )));
                }
                None => (part, Direction::Ascending),
            };
            if name.is_empty() {
                return Err(invalid("empty sort key".to_string()));
            }
            let field =
                Field::parse(name).ok_or_else(|| invalid(format!("unknown field '{name}'")))?;
            Ok(SortKey { field, direction })
        })
        .collect()
}

/// Compare two records by successive keys.
pub fn compare_by<R: Record>(keys: &[SortKey], a: &R, b: &R) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
