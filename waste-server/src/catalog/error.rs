//! Configuration errors.
//!
//! All of these are detected before any route is registered and abort
//! startup.

/// The catalog or the route table built from it is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A region or calendar route references an undeclared waste type
    #[error("{owner} references undeclared type '{waste_type}'")]
    UnknownType { owner: String, waste_type: String },

    /// A route or region references a parameter missing from the global schema
    #[error("{owner} references undeclared parameter '{parameter}'")]
    UnknownParameter { owner: String, parameter: String },

    /// A region-scoped route would let clients override the region
    #[error("region '{region}' must omit the 'region' parameter")]
    RegionScopeNotOmitted { region: String },

    /// Two regions or two types share a slug
    #[error("duplicate {kind} slug '{slug}'")]
    DuplicateSlug { kind: &'static str, slug: String },

    /// A slug is empty or contains characters other than `a-z` and `_`
    #[error("invalid {kind} slug '{slug}'")]
    InvalidSlug { kind: &'static str, slug: String },

    /// There must be exactly one calendar route without a type
    #[error("expected exactly one all-types calendar route, found {count}")]
    AllTypesRoute { count: usize },

    /// Two generated routes share method and path
    #[error("duplicate route {method} {path}")]
    DuplicateRoute { method: String, path: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigError::UnknownType {
            owner: "region 'zurich'".into(),
            waste_type: "glitter".into(),
        };
        assert_eq!(
            err.to_string(),
            "region 'zurich' references undeclared type 'glitter'"
        );

        let err = ConfigError::AllTypesRoute { count: 2 };
        assert_eq!(
            err.to_string(),
            "expected exactly one all-types calendar route, found 2"
        );

        let err = ConfigError::DuplicateRoute {
            method: "GET".into(),
            path: "/api/calendar".into(),
        };
        assert_eq!(err.to_string(), "duplicate route GET /api/calendar");
    }
}
