//! AI chat provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unrecognized response shape: {0}")]
    UnrecognizedResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// True for the one failure that callers must surface instead of degrading.
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::UnrecognizedResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_api_error() {
        let err = ProviderError::ApiError {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_provider_error_network() {
        let err = ProviderError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Network error"));
    }

    #[test]
    fn test_unrecognized_response_is_hard() {
        let err = ProviderError::UnrecognizedResponse("{\"foo\":1}".to_string());
        assert!(err.is_hard());
        assert!(err.to_string().contains("Unrecognized"));
    }

    #[test]
    fn test_other_errors_are_not_hard() {
        assert!(!ProviderError::Timeout(30).is_hard());
        assert!(!ProviderError::Network("refused".to_string()).is_hard());
    }
}
