use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::{
    domain::job::{Job, JobProcessor, JobProcessorApi},
    error::{AppError, AppResult},
    infrastructure::repositories::JobRepository,
};

/// Request for POST /process-job
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessJobRequest {
    pub job_id: String,
    pub job_type: String,
    #[serde(default, alias = "input_data")]
    pub input: JsonValue,
    pub user_id: String,
}

/// Response for POST /process-job
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessJobResponse {
    pub status: String,
    pub job_id: String,
}

pub struct JobController {
    job_processor: Arc<JobProcessor>,
    job_repo: Arc<dyn JobRepository>,
}

impl JobController {
    pub fn new(job_processor: Arc<JobProcessor>, job_repo: Arc<dyn JobRepository>) -> Self {
        Self {
            job_processor,
            job_repo,
        }
    }

    /// POST /process-job - Accept a job and process it in the background
    pub async fn process_job(
        State(controller): State<Arc<JobController>>,
        Json(request): Json<ProcessJobRequest>,
    ) -> AppResult<(StatusCode, Json<ProcessJobResponse>)> {
        if request.job_id.trim().is_empty() {
            return Err(AppError::BadRequest("job_id is required".to_string()));
        }
        if request.user_id.trim().is_empty() {
            return Err(AppError::BadRequest("user_id is required".to_string()));
        }

        let created = controller
            .job_repo
            .create_if_absent(
                &request.job_id,
                &request.job_type,
                &request.user_id,
                &request.input,
            )
            .await?;

        tracing::info!(
            job_id = %request.job_id,
            job_type = %request.job_type,
            user_id = %request.user_id,
            created = created,
            "Accepted job"
        );

        let processor = controller.job_processor.clone();
        let ProcessJobRequest {
            job_id,
            job_type,
            input,
            user_id,
        } = request;
        let spawned_job_id = job_id.clone();

        tokio::spawn(async move {
            processor
                .run(&spawned_job_id, &job_type, input, &user_id)
                .await;
        });

        Ok((
            StatusCode::ACCEPTED,
            Json(ProcessJobResponse {
                status: "accepted".to_string(),
                job_id,
            }),
        ))
    }

    /// GET /job/:job_id/status - Current snapshot of a job
    pub async fn get_job_status(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<String>,
    ) -> AppResult<Json<Job>> {
        let job = controller
            .job_repo
            .find_by_id(&job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {}", job_id)))?;

        Ok(Json(job))
    }
}
