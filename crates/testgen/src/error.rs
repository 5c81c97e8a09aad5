use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// The request itself is unusable (never retried).
    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    /// Network failure or 5xx-style outage.
    #[error("text generation service unavailable: {0}")]
    Unavailable(String),

    /// No response within the per-attempt timeout.
    #[error("text generation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The service answered but refused the request (never retried).
    #[error("text generation rejected: {0}")]
    Rejected(String),
}

impl GeneratorError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeneratorError::Unavailable(_) | GeneratorError::Timeout { .. }
        )
    }
}
