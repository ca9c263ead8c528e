//! Error types for the problems store
//!
//! Only transport and structural faults live here. Business outcomes such as a
//! lookup that matched nothing travel inside response values instead.

use hyper::StatusCode;

/// Main error type for problems store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required routing parameter was absent from the wire request
    #[error("Bad routing: {0}")]
    BadRouting(String),

    #[error("Catalog load failed: {0}")]
    CatalogLoad(String),

    #[error("Catalog not initialized")]
    CatalogUnavailable,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded after {0} ms")]
    DeadlineExceeded(u64),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRouting(_) => StatusCode::BAD_REQUEST,
            Self::CatalogLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            Self::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = self.to_string();
        (status, body)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::CatalogLoad(format!("JSON error: {}", err))
    }
}

/// Result type alias for problems store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_routing_is_client_error() {
        let err = StoreError::BadRouting("missing problemId".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let (status, body) = err.into_status_code_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Bad routing: missing problemId");
    }

    #[test]
    fn test_cancellation_statuses() {
        assert_eq!(StoreError::Cancelled.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            StoreError::DeadlineExceeded(5).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_json_error_converts_to_load_failure() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::CatalogLoad(_)));
        assert!(err.to_string().starts_with("Catalog load failed: JSON error"));
    }
}
