//! Error types for the WordPress provider

use thiserror::Error;

/// WordPress provider errors
#[derive(Error, Debug)]
pub enum WordPressError {
    /// Credentials were rejected (401/403)
    #[error("Authentication failed (status {status_code}): {message}")]
    AuthenticationFailed { status_code: u16, message: String },

    /// API request returned an error
    #[error("WordPress API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] bridge_traits::error::BridgeError),
}

/// Result type for WordPress operations
pub type Result<T> = std::result::Result<T, WordPressError>;

impl WordPressError {
    /// Classify a non-2xx response
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => WordPressError::AuthenticationFailed {
                status_code,
                message,
            },
            _ => WordPressError::ApiError {
                status_code,
                message,
            },
        }
    }
}

impl From<WordPressError> for bridge_traits::error::BridgeError {
    fn from(error: WordPressError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            WordPressError::AuthenticationFailed {
                status_code,
                message,
            } => BridgeError::HttpStatus {
                status: status_code,
                message: format!("Authentication failed: {}", message),
            },
            WordPressError::ApiError {
                status_code,
                message,
            } => BridgeError::HttpStatus {
                status: status_code,
                message,
            },
            WordPressError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            WordPressError::BridgeError(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_error_display() {
        let error = WordPressError::ApiError {
            status_code: 502,
            message: "Bad Gateway".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "WordPress API error (status 502): Bad Gateway"
        );
    }

    #[test]
    fn test_from_status_classifies_auth() {
        assert!(matches!(
            WordPressError::from_status(401, "no".to_string()),
            WordPressError::AuthenticationFailed { .. }
        ));
        assert!(matches!(
            WordPressError::from_status(413, "too large".to_string()),
            WordPressError::ApiError { .. }
        ));
    }

    #[test]
    fn test_error_conversion_keeps_status() {
        let error = WordPressError::from_status(403, "Sorry, you are not allowed".to_string());
        let bridge_error: BridgeError = error.into();

        assert_eq!(bridge_error.status_code(), Some(403));

        let bridge_error: BridgeError = WordPressError::ParseError("eof".to_string()).into();
        assert_eq!(bridge_error.status_code(), None);
    }
}
