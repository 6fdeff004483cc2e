use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Annotation service error: {0}")]
    Remote(String),

    #[error("Malformed annotation response: {raw}")]
    MalformedResponse { raw: String },

    #[error("Duplicate ledger entry for item: {0}")]
    DuplicateKey(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    /// Only malformed annotation payloads are handled inline by the driver.
    /// Everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::MalformedResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_response_is_the_only_recoverable_error() {
        assert!(PipelineError::MalformedResponse {
            raw: "not json".into()
        }
        .is_recoverable());
        assert!(!PipelineError::Remote("connection refused".into()).is_recoverable());
        assert!(!PipelineError::Feed("listing fetch failed".into()).is_recoverable());
        assert!(!PipelineError::DuplicateKey("abc123".into()).is_recoverable());
    }
}
