use crate::domain::job::{Job, JobStatusUpdate};
use crate::error::AppResult;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Repository for job rows.
///
/// Implementations own the timestamp bookkeeping of a status write:
/// - `updated_at` on every update
/// - `started_at` the first time a job enters `processing`
/// - `completed_at` on every terminal write
///
/// Fields left as `None` in a `JobStatusUpdate` are not touched, except that
/// `result_data` is only kept on `completed` and `error_*` only on `failed`.
/// A `processing` write (including a re-run) clears both and `completed_at`.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Apply a partial status update
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if no job has this id
    async fn update_status(&self, job_id: &str, update: &JobStatusUpdate) -> AppResult<()>;

    /// Read a job snapshot
    async fn find_by_id(&self, job_id: &str) -> AppResult<Option<Job>>;

    /// Register a submission as `queued` unless a row already exists.
    /// Returns whether a row was inserted.
    async fn create_if_absent(
        &self,
        job_id: &str,
        job_type: &str,
        user_id: &str,
        input: &JsonValue,
    ) -> AppResult<bool>;
}
