//! Typed errors for product API operations

use crate::cart::ProductId;
use thiserror::Error;

/// Product API errors with typed variants
///
/// Lets callers tell a missing product apart from a rejected request or a
/// transient failure without string matching.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested product does not exist
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// Resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by the API (HTTP 400), e.g. failed server-side validation
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or rejected credentials (HTTP 401/403)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Server-side error (HTTP 5xx)
    #[error("Service error: {0}")]
    ServiceError(String),

    /// Connection refused, timeout and similar
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// Whether retrying the same request later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ServiceError(_) | ApiError::Network(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::ProductNotFound(_) | ApiError::NotFound(_))
    }

    /// Convert HTTP status code and error text into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status.as_u16() {
            400 => ApiError::BadRequest(error_text),
            401 | 403 => ApiError::Unauthorized(error_text),
            404 => ApiError::NotFound(error_text),
            500..=599 => ApiError::ServiceError(error_text),
            _ => ApiError::Other(anyhow::anyhow!("HTTP {}: {}", status, error_text)),
        }
    }

    /// Convert network/connection errors into a typed error
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            ApiError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_http_status(status, e.to_string())
        } else {
            ApiError::Other(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        let err = ApiError::from_http_status(reqwest::StatusCode::NOT_FOUND, "gone".to_string());
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(err.is_not_found());

        let err =
            ApiError::from_http_status(reqwest::StatusCode::BAD_REQUEST, "bad".to_string());
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err =
            ApiError::from_http_status(reqwest::StatusCode::FORBIDDEN, "nope".to_string());
        assert!(matches!(err, ApiError::Unauthorized(_)));

        let err = ApiError::from_http_status(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            "down".to_string(),
        );
        assert!(matches!(err, ApiError::ServiceError(_)));
        assert!(err.is_retryable());

        let err = ApiError::from_http_status(reqwest::StatusCode::IM_A_TEAPOT, "tea".to_string());
        assert!(matches!(err, ApiError::Other(_)));
    }

    #[test]
    fn test_bad_request_not_retryable() {
        assert!(!ApiError::BadRequest("invalid price".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ApiError::ProductNotFound(7).to_string(), "Product 7 not found");
        assert_eq!(
            ApiError::Network("refused".to_string()).to_string(),
            "Network error: refused"
        );
    }
}
