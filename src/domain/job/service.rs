use super::error::JobServiceError;
use super::input::{JobInput, SpeechTranslationInput, TextToSpeechInput, VoiceCloneInput};
use super::model::{JobResult, JobStatusUpdate};
use super::text::prepare_text;
use crate::infrastructure::repositories::{
    AudioStorageRepository, JobRepository, SynthesisRepository, SynthesisRequest, UsageRepository,
};
use async_trait::async_trait;
use base64::Engine;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Raw audio bytes per millisecond used for the duration estimate.
/// This is a byte-count heuristic, not a decoded measurement.
const AUDIO_BYTES_PER_MS: usize = 48;

const PLACEHOLDER_TRANSCRIPTION: &str = "Placeholder transcription";
const PLACEHOLDER_TRANSLATION: &str = "Placeholder translation";
const TRANSLATION_SOURCE_LANGUAGE: &str = "auto";
const CLONED_VOICE_TYPE: &str = "cloned";

pub fn estimate_duration_ms(audio: &[u8]) -> u64 {
    (audio.len() / AUDIO_BYTES_PER_MS) as u64
}

/// Drives submitted jobs from `queued` to a terminal status
pub struct JobProcessor {
    job_repo: Arc<dyn JobRepository>,
    storage_repo: Arc<dyn AudioStorageRepository>,
    synthesis_repo: Arc<dyn SynthesisRepository>,
    usage_repo: Option<Arc<dyn UsageRepository>>,
}

impl JobProcessor {
    pub fn new(
        job_repo: Arc<dyn JobRepository>,
        storage_repo: Arc<dyn AudioStorageRepository>,
        synthesis_repo: Arc<dyn SynthesisRepository>,
    ) -> Self {
        Self {
            job_repo,
            storage_repo,
            synthesis_repo,
            usage_repo: None,
        }
    }

    /// Record the estimated minutes of every completed job on the owner's profile
    pub fn with_usage_tracking(mut self, usage_repo: Arc<dyn UsageRepository>) -> Self {
        self.usage_repo = Some(usage_repo);
        self
    }
}

#[async_trait]
pub trait JobProcessorApi: Send + Sync {
    /// Process one job to completion
    ///
    /// This operation:
    /// - Marks the job as processing
    /// - Runs the handler for its type, reporting progress checkpoints
    /// - Writes exactly one terminal status (completed or failed)
    ///
    /// It never fails outward: callers observe the outcome by reading the
    /// job's status. Running the same job twice does the work twice.
    async fn run(&self, job_id: &str, job_type: &str, input: JsonValue, user_id: &str);
}

#[async_trait]
impl JobProcessorApi for JobProcessor {
    async fn run(&self, job_id: &str, job_type: &str, input: JsonValue, user_id: &str) {
        tracing::info!(
            job_id = %job_id,
            job_type = %job_type,
            user_id = %user_id,
            "Starting job processing"
        );

        let start_time = std::time::Instant::now();

        match self.process(job_id, job_type, input, user_id).await {
            Ok(result) => {
                tracing::info!(
                    job_id = %job_id,
                    job_type = %job_type,
                    latency_ms = start_time.elapsed().as_millis(),
                    audio_url = %result.audio_url(),
                    "Job completed successfully"
                );
                self.track_usage(user_id, &result).await;
            }
            Err(e) => {
                tracing::error!(
                    job_id = %job_id,
                    job_type = %job_type,
                    error = %e,
                    "Job failed"
                );
                self.record_failure(job_id, &e).await;
            }
        }
    }
}

impl JobProcessor {
    async fn process(
        &self,
        job_id: &str,
        job_type: &str,
        input: JsonValue,
        user_id: &str,
    ) -> Result<JobResult, JobServiceError> {
        self.report(job_id, JobStatusUpdate::processing(10, "Starting processing..."))
            .await?;

        let input = JobInput::parse(job_type, input)?;
        tracing::debug!(job_id = %job_id, job_type = %input.job_type(), "Dispatching job");

        let result = match input {
            JobInput::TextToSpeech(input) => self.text_to_speech(job_id, input, user_id).await?,
            JobInput::VoiceClone(input) => self.voice_clone(job_id, input, user_id).await?,
            JobInput::SpeechTranslation(input) => {
                self.speech_translation(job_id, input, user_id).await?
            }
        };

        let payload = serde_json::to_value(&result).map_err(anyhow::Error::from)?;
        self.report(job_id, JobStatusUpdate::completed(payload)).await?;

        Ok(result)
    }

    async fn text_to_speech(
        &self,
        job_id: &str,
        input: TextToSpeechInput,
        user_id: &str,
    ) -> Result<JobResult, JobServiceError> {
        let text = prepare_text(input.text.as_deref().unwrap_or_default());
        if text.is_empty() {
            return Err(JobServiceError::Invalid(
                "No text provided for TTS".to_string(),
            ));
        }

        self.report(job_id, JobStatusUpdate::processing(30, "Generating speech..."))
            .await?;

        let request = SynthesisRequest {
            text: text.clone(),
            voice_id: input.voice_id.clone(),
            language: input.language.clone(),
            emotion: input.emotion,
            speed: input.speed,
            pitch: input.pitch,
        };
        let audio_data = self
            .synthesis_repo
            .synthesize(&request)
            .await
            .map_err(JobServiceError::Synthesis)?;

        self.report(job_id, JobStatusUpdate::processing(70, "Uploading audio..."))
            .await?;

        let audio_url = self
            .upload(&audio_data, &format!("{}/{}", user_id, job_id))
            .await?;

        self.report(job_id, JobStatusUpdate::processing(90, "Finalizing..."))
            .await?;

        Ok(JobResult::TextToSpeech {
            audio_url,
            duration_ms: estimate_duration_ms(&audio_data),
            text,
            voice_id: input.voice_id,
            language: input.language,
        })
    }

    async fn voice_clone(
        &self,
        job_id: &str,
        input: VoiceCloneInput,
        user_id: &str,
    ) -> Result<JobResult, JobServiceError> {
        let (text, audio_sample) = match (input.text, input.audio_sample.as_deref()) {
            (Some(text), Some(sample)) if !text.trim().is_empty() && !sample.trim().is_empty() => {
                (text, sample)
            }
            _ => {
                return Err(JobServiceError::Invalid(
                    "Text and audio sample required for voice cloning".to_string(),
                ))
            }
        };

        let reference_audio = decode_audio_sample(audio_sample)?;

        self.report(job_id, JobStatusUpdate::processing(40, "Cloning voice..."))
            .await?;

        let cloned_audio = self
            .synthesis_repo
            .clone_voice(&reference_audio, &text)
            .await
            .map_err(JobServiceError::Synthesis)?;

        self.report(job_id, JobStatusUpdate::processing(80, "Uploading result..."))
            .await?;

        let audio_url = self
            .upload(&cloned_audio, &format!("{}/cloned/{}", user_id, job_id))
            .await?;

        Ok(JobResult::VoiceClone {
            audio_url,
            duration_ms: estimate_duration_ms(&cloned_audio),
            text,
            voice_type: CLONED_VOICE_TYPE.to_string(),
        })
    }

    /// Not implemented yet: returns placeholder transcript and translation
    /// and only synthesizes the placeholder.
    async fn speech_translation(
        &self,
        job_id: &str,
        input: SpeechTranslationInput,
        user_id: &str,
    ) -> Result<JobResult, JobServiceError> {
        self.report(job_id, JobStatusUpdate::processing(50, "Transcribing audio..."))
            .await?;

        // TODO: transcribe and translate the submitted audio once a speech
        // recognition gateway exists
        let original_text = PLACEHOLDER_TRANSCRIPTION.to_string();
        let translated_text = PLACEHOLDER_TRANSLATION.to_string();

        let request = SynthesisRequest::new(prepare_text(&translated_text), &input.target_language);
        let audio_data = self
            .synthesis_repo
            .synthesize(&request)
            .await
            .map_err(JobServiceError::Synthesis)?;

        let audio_url = self
            .upload(&audio_data, &format!("{}/translated/{}", user_id, job_id))
            .await?;

        Ok(JobResult::SpeechTranslation {
            original_text,
            translated_text,
            audio_url,
            source_language: TRANSLATION_SOURCE_LANGUAGE.to_string(),
            target_language: input.target_language,
        })
    }

    async fn report(&self, job_id: &str, update: JobStatusUpdate) -> Result<(), JobServiceError> {
        tracing::debug!(
            job_id = %job_id,
            status = %update.status,
            progress = ?update.progress,
            message = ?update.progress_message,
            "Reporting job progress"
        );

        self.job_repo
            .update_status(job_id, &update)
            .await
            .map_err(JobServiceError::from)
    }

    async fn upload(&self, audio: &[u8], path: &str) -> Result<String, JobServiceError> {
        self.storage_repo
            .upload_audio(audio, path)
            .await
            .map_err(JobServiceError::Storage)
    }

    /// Terminal failure write. If even this write fails the failure is
    /// logged and dropped.
    async fn record_failure(&self, job_id: &str, error: &JobServiceError) {
        let update = JobStatusUpdate::failed(error.to_string());

        if let Err(write_error) = self.job_repo.update_status(job_id, &update).await {
            tracing::error!(
                job_id = %job_id,
                error = %error,
                write_error = %write_error,
                "Could not record job failure, dropping it"
            );
        }
    }

    async fn track_usage(&self, user_id: &str, result: &JobResult) {
        let (Some(usage_repo), Some(duration_ms)) = (&self.usage_repo, result.duration_ms()) else {
            return;
        };

        let minutes = duration_ms as f64 / 60_000.0;
        if let Err(e) = usage_repo.record_usage(user_id, minutes).await {
            tracing::warn!(
                user_id = %user_id,
                minutes = minutes,
                error = %e,
                "Failed to record usage"
            );
        }
    }
}

/// Decode a base64 reference sample, accepting the `data:...;base64,` form
fn decode_audio_sample(sample: &str) -> Result<Vec<u8>, JobServiceError> {
    let encoded = match sample.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => sample,
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| JobServiceError::Invalid(format!("Invalid audio sample: {}", e)))
}
