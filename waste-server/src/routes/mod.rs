//! Route generation.
//!
//! At startup the catalog is expanded into an immutable [`RouteTable`]:
//! every calendar descriptor once unscoped and once per region that collects
//! its type, plus the station and parameter listings. Each route carries the
//! projection of the global parameter schema it accepts.

mod descriptor;
mod table;
mod validate;

pub use descriptor::{
    Endpoint, JSON_ONLY, JSON_OR_ICAL, OutputFormat, RouteDescriptor, parse_format,
};
pub use table::{API_PREFIX, RouteTable, calendar_route, generate, split_format};
pub use validate::validate_query;
