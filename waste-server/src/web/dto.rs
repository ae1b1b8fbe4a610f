//! Data transfer objects for web responses.

use serde::Serialize;

use crate::query::Page;

/// Counts reported alongside every JSON result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Matching rows before pagination
    pub total_count: usize,

    /// Rows in this response
    pub row_count: usize,
}

/// JSON response envelope.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "_metadata")]
    pub metadata: Metadata,

    pub result: Vec<T>,
}

impl<T> Envelope<T> {
    /// Wrap one page of query results.
    pub fn from_page(page: Page<T>) -> Self {
        Self {
            metadata: Metadata {
                total_count: page.total_count,
                row_count: page.rows.len(),
            },
            result: page.rows,
        }
    }

    /// Wrap an unpaginated listing.
    pub fn complete(result: Vec<T>) -> Self {
        Self {
            metadata: Metadata {
                total_count: result.len(),
                row_count: result.len(),
            },
            result,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_shape() {
        let page = Page {
            total_count: 7,
            rows: vec!["a", "b"],
        };
        let value = serde_json::to_value(Envelope::from_page(page)).unwrap();
        assert_eq!(
            value,
            json!({
                "_metadata": {"total_count": 7, "row_count": 2},
                "result": ["a", "b"]
            })
        );
    }

    #[test]
    fn complete_listing_counts() {
        let envelope = Envelope::complete(vec![1, 2, 3]);
        assert_eq!(
            envelope.metadata,
            Metadata {
                total_count: 3,
                row_count: 3,
            }
        );
    }
}
