//! Domain types for the waste collection API.
//!
//! Records are immutable once imported. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod calendar;
mod literal;
mod record;
mod station;
mod zip;

pub use calendar::CalendarRecord;
pub use literal::{parse_bool, parse_iso_date};
pub use record::{Field, FieldValue, Record};
pub use station::{StationKind, StationRecord};
pub use zip::{InvalidZip, ZIP_MAX, ZIP_MIN, Zip};
