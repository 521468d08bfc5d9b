use thiserror::Error;

/// Errors from the reasoning-capability backend.
///
/// A timeout is deliberately its own variant: the pipeline treats it as a
/// recoverable per-domain failure, exactly like a malformed response.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API error: {message}")]
    Api { message: String },

    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("invalid response from model: {message}")]
    InvalidResponse { message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl BackendError {
    pub fn other(message: impl Into<String>) -> Self {
        BackendError::Other {
            message: message.into(),
        }
    }
}
