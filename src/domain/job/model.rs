use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

/// Error code recorded on every failed job
pub const PROCESSING_ERROR: &str = "PROCESSING_ERROR";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: String,
    pub job_type: String,
    pub user_id: String,
    pub status: JobStatus,
    pub progress: i32,
    pub progress_message: Option<String>,
    pub input_data: Option<JsonValue>,
    pub result_data: Option<JsonValue>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    #[serde(rename = "queued")]
    Queued,
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// No transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    TextToSpeech,
    VoiceClone,
    SpeechTranslation,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::TextToSpeech => "text_to_speech",
            JobType::VoiceClone => "voice_clone",
            JobType::SpeechTranslation => "speech_translation",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text_to_speech" => Ok(JobType::TextToSpeech),
            "voice_clone" => Ok(JobType::VoiceClone),
            "speech_translation" => Ok(JobType::SpeechTranslation),
            other => Err(format!("Unknown job type: {}", other)),
        }
    }
}

/// A partial update of a job row. Fields left as `None` are not touched.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatusUpdate {
    pub status: JobStatus,
    pub progress: Option<i32>,
    pub progress_message: Option<String>,
    pub result: Option<JsonValue>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl JobStatusUpdate {
    pub fn processing(progress: i32, message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Processing,
            progress: Some(progress),
            progress_message: Some(message.into()),
            result: None,
            error_code: None,
            error_message: None,
        }
    }

    pub fn completed(result: JsonValue) -> Self {
        Self {
            status: JobStatus::Completed,
            progress: Some(100),
            progress_message: Some("Processing completed".to_string()),
            result: Some(result),
            error_code: None,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: JobStatus::Failed,
            progress: Some(0),
            progress_message: Some(format!("Processing failed: {}", message)),
            result: None,
            error_code: Some(PROCESSING_ERROR.to_string()),
            error_message: Some(message),
        }
    }
}

/// Output of a finished job, stored as `result_data`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JobResult {
    TextToSpeech {
        audio_url: String,
        duration_ms: u64,
        text: String,
        voice_id: String,
        language: String,
    },
    VoiceClone {
        audio_url: String,
        duration_ms: u64,
        text: String,
        voice_type: String,
    },
    SpeechTranslation {
        original_text: String,
        translated_text: String,
        audio_url: String,
        source_language: String,
        target_language: String,
    },
}

impl JobResult {
    pub fn audio_url(&self) -> &str {
        match self {
            JobResult::TextToSpeech { audio_url, .. }
            | JobResult::VoiceClone { audio_url, .. }
            | JobResult::SpeechTranslation { audio_url, .. } => audio_url,
        }
    }

    /// Estimated length of the produced audio, when the handler reports one
    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            JobResult::TextToSpeech { duration_ms, .. }
            | JobResult::VoiceClone { duration_ms, .. } => Some(*duration_ms),
            JobResult::SpeechTranslation { .. } => None,
        }
    }
}
