//! Query error types.

use crate::store::StoreError;

/// A request parameter failed validation.
///
/// Always raised before the store is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' for parameter '{parameter}': {reason}")]
pub struct ValidationError {
    /// Offending parameter name (`format` for the path suffix)
    pub parameter: String,

    /// Value as received
    pub value: String,

    /// Why it was rejected
    pub reason: String,
}

impl ValidationError {
    pub fn new(
        parameter: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from running a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
