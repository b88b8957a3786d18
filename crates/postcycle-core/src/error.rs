//! Pipeline error taxonomy.

use ghost_admin::BackendError;

/// Errors that abort a lifecycle run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("invalid selection criteria: {0}")]
    InvalidCriteria(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_wraps_source() {
        let err: PipelineError = BackendError::NotFound("p1".to_string()).into();
        let msg = err.to_string();
        assert!(msg.contains("backend error"));
        assert!(msg.contains("p1"));
    }
}
