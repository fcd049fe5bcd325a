use crate::error::AppError;

/// Failures of a single job run. Messages are recorded verbatim as the
/// job's `error_message`.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Synthesis(String),
    #[error("{0}")]
    Storage(String),
    #[error("job not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for JobServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => JobServiceError::Invalid(msg),
            AppError::NotFound(msg) => JobServiceError::NotFound(msg),
            _ => JobServiceError::Storage(err.to_string()),
        }
    }
}
