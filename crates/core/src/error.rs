//! Error types shared across media catalog services

use thiserror::Error;

/// Canonical error type for the media catalog platform.
///
/// Service crates define their own domain errors where it helps (ingestion has
/// `IngestionError`); this type covers the shared concerns: configuration,
/// database access, transport, and validation.
#[derive(Debug, Error)]
pub enum MediaCatalogError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        /// Environment variable or setting that caused the failure, if known.
        key: Option<String>,
    },

    /// Database connectivity or query failure.
    #[error("Database error: {message}")]
    DatabaseError {
        message: String,
        /// Logical operation that failed, for log correlation.
        operation: Option<String>,
    },

    /// Transport-level failure talking to another service or provider.
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation exceeded its deadline.
    #[error("Operation '{operation}' timed out after {duration_ms}ms")]
    TimeoutError { operation: String, duration_ms: u64 },

    /// Input failed a validation rule.
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },
}

impl MediaCatalogError {
    /// Whether the error is transient and worth retrying.
    ///
    /// Network and timeout failures are considered transient. Configuration,
    /// database, and validation failures will not improve on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MediaCatalogError::NetworkError { .. } | MediaCatalogError::TimeoutError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let network = MediaCatalogError::NetworkError {
            message: "connection reset".to_string(),
            source: None,
        };
        assert!(network.is_retryable());

        let timeout = MediaCatalogError::TimeoutError {
            operation: "provider fetch".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_retryable());

        let validation = MediaCatalogError::ValidationError {
            message: "title must not be empty".to_string(),
            field: Some("title".to_string()),
        };
        assert!(!validation.is_retryable());

        let config = MediaCatalogError::ConfigurationError {
            message: "missing database url".to_string(),
            key: Some("DATABASE_URL".to_string()),
        };
        assert!(!config.is_retryable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = MediaCatalogError::DatabaseError {
            message: "unique violation".to_string(),
            operation: Some("save_content".to_string()),
        };
        assert_eq!(err.to_string(), "Database error: unique violation");

        let err = MediaCatalogError::TimeoutError {
            operation: "events_on_day".to_string(),
            duration_ms: 30000,
        };
        assert!(err.to_string().contains("events_on_day"));
        assert!(err.to_string().contains("30000"));
    }
}
