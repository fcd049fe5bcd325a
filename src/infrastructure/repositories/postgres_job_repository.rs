use super::job_repository::JobRepository;
use crate::domain::job::{Job, JobStatusUpdate};
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Postgres-backed job repository (the `jobs` table of the hosted backend)
pub struct PostgresJobRepository {
    pool: Arc<DbPool>,
}

impl PostgresJobRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn update_status(&self, job_id: &str, update: &JobStatusUpdate) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = $2,
                progress = COALESCE($3, progress),
                progress_message = COALESCE($4, progress_message),
                result_data = CASE WHEN $2 IN ('processing', 'failed') THEN NULL
                                   ELSE COALESCE($5, result_data) END,
                error_code = CASE WHEN $2 IN ('processing', 'completed') THEN NULL
                                  ELSE COALESCE($6, error_code) END,
                error_message = CASE WHEN $2 IN ('processing', 'completed') THEN NULL
                                     ELSE COALESCE($7, error_message) END,
                updated_at = $8,
                started_at = CASE WHEN $2 = 'processing' THEN COALESCE(started_at, $8)
                                  ELSE started_at END,
                completed_at = CASE WHEN $2 IN ('completed', 'failed') THEN $8
                                    WHEN $2 = 'processing' THEN NULL
                                    ELSE completed_at END
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(update.status.as_str())
        .bind(update.progress)
        .bind(update.progress_message.as_deref())
        .bind(update.result.clone())
        .bind(update.error_code.as_deref())
        .bind(update.error_message.as_deref())
        .bind(now)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(job_id.to_string()));
        }

        tracing::info!(
            job_id = %job_id,
            status = %update.status,
            progress = ?update.progress,
            "Updated job status"
        );

        Ok(())
    }

    async fn find_by_id(&self, job_id: &str) -> AppResult<Option<Job>> {
        let pool = self.pool.as_ref();
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, job_type, user_id, status, progress, progress_message,
                   input_data, result_data, error_code, error_message,
                   created_at, updated_at, started_at, completed_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }

    async fn create_if_absent(
        &self,
        job_id: &str,
        job_type: &str,
        user_id: &str,
        input: &JsonValue,
    ) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO jobs (id, job_type, user_id, status, progress, input_data, created_at, updated_at)
            VALUES ($1, $2, $3, 'queued', 0, $4, $5, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(job_type)
        .bind(user_id)
        .bind(input.clone())
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
