//! Query engine.
//!
//! Validated request parameters become a [`RecordQuery`] (filters, sort
//! keys, offset and limit) which the record store executes. Filters are
//! tagged [`FilterKind`]s chosen by each parameter's binding in the
//! catalog, so the engine never branches on parameter names.

mod engine;
mod error;
mod filter;
mod params;
mod record_query;
mod sort;

pub use engine::{QueryEngine, Scope, build_query};
pub use error::{QueryError, ValidationError};
pub use filter::{FieldFilter, FilterKind};
pub use params::{BoundValue, ParamValue, ValidatedParams};
pub use record_query::{Page, RecordQuery};
pub use sort::{Direction, SortKey, compare_by, parse_sort};
