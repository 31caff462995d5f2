use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can stop a progress operation. Never leaves the access
/// layer as an `Err`; it is folded into a failure envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("User not authenticated")]
    AuthenticationMissing,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    Store(String),
}

impl ProgressError {
    pub fn missing_module_name() -> Self {
        Self::ValidationFailed("Module name is required and must be a string".into())
    }

    pub fn store(action: &str, source: &anyhow::Error) -> Self {
        Self::Store(format!("Failed to {action} progress: {source:#}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProgressError::AuthenticationMissing => StatusCode::UNAUTHORIZED,
            ProgressError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ProgressError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
