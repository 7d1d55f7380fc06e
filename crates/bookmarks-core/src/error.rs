use thiserror::Error;

/// Core error types for bookmark operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid guid: {0}")]
    InvalidGuid(String),

    #[error("Invalid bookmark data: {message}")]
    InvalidBookmark { message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),
}

impl CoreError {
    /// Create a new InvalidGuid error
    pub fn invalid_guid(guid: impl Into<String>) -> Self {
        Self::InvalidGuid(guid.into())
    }

    /// Create a new InvalidBookmark error
    pub fn invalid_bookmark(message: impl Into<String>) -> Self {
        Self::InvalidBookmark {
            message: message.into(),
        }
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGuid(_) | Self::InvalidBookmark { .. } | Self::JsonError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_guid("xyz");
        assert_eq!(err.to_string(), "Invalid guid: xyz");

        let err = CoreError::invalid_bookmark("link too long");
        assert_eq!(err.to_string(), "Invalid bookmark data: link too long");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CoreError::invalid_guid("x").is_client_error());
        assert!(CoreError::invalid_bookmark("x").is_client_error());
        let uuid_err = uuid::Uuid::parse_str("nope").unwrap_err();
        assert!(!CoreError::from(uuid_err).is_client_error());
    }
}
