use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// The named entity (`"invoice"`, `"order"`, `"menu"`, ...) does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Aggregation failed: {0}")]
    AggregationFailed(String),
    #[error("Failed to decode results: {0}")]
    DecodeFailed(String),
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(DomainError::NotFound("invoice").to_string(), "invoice not found");
    }

    #[test]
    fn timeout_reports_the_bound() {
        let err = DomainError::Timeout(Duration::from_secs(100));
        assert_eq!(err.to_string(), "Operation timed out after 100s");
    }
}
