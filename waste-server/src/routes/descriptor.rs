//! Generated route descriptors.

use std::fmt;

use axum::http::Method;

use crate::catalog::ParameterSchema;
use crate::query::ValidationError;

/// Response format selected by the path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Ical,
}

impl OutputFormat {
    /// Path suffix selecting this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => ".json",
            OutputFormat::Ical => ".ics",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Formats of listing routes.
pub const JSON_ONLY: &[OutputFormat] = &[OutputFormat::Json];

/// Formats of calendar routes.
pub const JSON_OR_ICAL: &[OutputFormat] = &[OutputFormat::Json, OutputFormat::Ical];

/// Resolve a path suffix against the formats a route allows.
///
/// The empty suffix means JSON. The route has already matched, so an
/// unsupported suffix is a validation failure on `format`.
pub fn parse_format(
    extension: &str,
    allowed: &[OutputFormat],
) -> Result<OutputFormat, ValidationError> {
    if extension.is_empty() {
        return Ok(OutputFormat::Json);
    }
    allowed
        .iter()
        .copied()
        .find(|f| f.extension() == extension)
        .ok_or_else(|| {
            let expected = std::iter::once("''".to_string())
                .chain(allowed.iter().map(|f| format!("'{f}'")))
                .collect::<Vec<_>>()
                .join(", ");
            ValidationError::new("format", extension, format!("expected one of {expected}"))
        })
}

/// What a route serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Station listing
    Stations,

    /// Calendar entries, optionally scoped to a region and a type
    Calendar {
        region: Option<String>,
        waste_type: Option<String>,
    },

    /// Region slugs
    Regions,

    /// Type slugs, optionally narrowed by the `region` parameter
    Types,
}

/// One generated route. Immutable once the table is built.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub method: Method,

    /// Path without the format suffix
    pub path: String,

    pub formats: &'static [OutputFormat],

    /// Parameters the route accepts
    pub params: ParameterSchema,

    pub endpoint: Endpoint,

    /// Human-readable title, used as the feed name
    pub description: String,
}

impl RouteDescriptor {
    /// Path template including the format placeholder.
    pub fn template(&self) -> String {
        format!("{}{{format}}", self.path)
    }
}
