//! Error types for ghost-admin

use thiserror::Error;

/// Errors that can occur while talking to the content backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport-level failure (connect, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The Admin API answered with a non-success status
    #[error("Admin API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Admin API key is not in `<id>:<hex secret>` form
    #[error("Invalid admin API key: {0}")]
    InvalidApiKey(String),

    /// Token signing failed
    #[error("Failed to sign admin token: {0}")]
    Token(String),

    /// Item does not exist in the backend
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Backend refused the write
    #[error("Write rejected for post {id}: {reason}")]
    Rejected { id: String, reason: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BackendError::Token(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = BackendError::Api {
            status: 422,
            body: "ValidationError".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("ValidationError"));
    }

    #[test]
    fn test_rejected_display() {
        let err = BackendError::Rejected {
            id: "abc".to_string(),
            reason: "injected".to_string(),
        };
        assert!(err.to_string().contains("abc"));
    }
}
