//! Record store error types.

/// Errors from a record store backend.
///
/// The message may contain storage internals; the web layer logs it and
/// answers with a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Backend not reachable or not ready
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backend rejected or failed the query
    #[error("query on {collection} failed: {message}")]
    Query {
        collection: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = StoreError::Query {
            collection: "calendar",
            message: "cursor timed out".into(),
        };
        assert_eq!(
            err.to_string(),
            "query on calendar failed: cursor timed out"
        );
    }
}
