//! Store-level query: filters, sort keys and a page window.

use crate::domain::Record;

use super::filter::FieldFilter;
use super::sort::{SortKey, compare_by};

/// A fully resolved query against one collection.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    /// All must match
    pub filters: Vec<FieldFilter>,

    /// Applied in order as tie-breakers
    pub sort: Vec<SortKey>,

    pub offset: usize,

    pub limit: usize,
}

impl RecordQuery {
    /// Whether a record satisfies every filter.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Filter, stable-sort, count and paginate.
    ///
    /// Records that compare equal on every sort key keep their input order.
    pub fn run<'r, R: Record>(&self, records: impl IntoIterator<Item = &'r R>) -> Page<R> {
        let mut matched: Vec<&R> = records.into_iter().filter(|r| self.matches(*r)).collect();
        if !self.sort.is_empty() {
            matched.sort_by(|a, b| compare_by(&self.sort, *a, *b));
        }
        let total_count = matched.len();
        let rows = matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect();
        Page { total_count, rows }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<R> {
    /// Matching records before pagination
    pub total_count: usize,

    /// Records on this page
    pub rows: Vec<R>,
}

impl<R> Page<R> {
    /// Number of records actually returned.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
