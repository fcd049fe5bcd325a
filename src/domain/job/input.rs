use super::error::JobServiceError;
use super::model::JobType;
use serde::Deserialize;
use serde_json::Value as JsonValue;

fn default_language() -> String {
    "en".to_string()
}

fn default_voice_id() -> String {
    "default".to_string()
}

fn default_emotion() -> String {
    "neutral".to_string()
}

fn default_rate() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TextToSpeechInput {
    /// Missing and `null` text are both reported by the handler as no text
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_emotion")]
    pub emotion: String,
    #[serde(default = "default_rate")]
    pub speed: f32,
    #[serde(default = "default_rate")]
    pub pitch: f32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VoiceCloneInput {
    #[serde(default)]
    pub text: Option<String>,
    /// Base64 reference audio, optionally as a data URL
    #[serde(default)]
    pub audio_sample: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechTranslationInput {
    #[serde(default = "default_language")]
    pub target_language: String,
}

/// Job payload, typed by job kind
#[derive(Debug, Clone, PartialEq)]
pub enum JobInput {
    TextToSpeech(TextToSpeechInput),
    VoiceClone(VoiceCloneInput),
    SpeechTranslation(SpeechTranslationInput),
}

impl JobInput {
    /// Resolve the raw `job_type` and `input` mapping of a submission.
    ///
    /// Unknown types and malformed fields are validation errors. Required
    /// field checks happen in the handlers so they can report their own
    /// messages.
    pub fn parse(job_type: &str, input: JsonValue) -> Result<Self, JobServiceError> {
        let job_type: JobType = job_type.parse().map_err(JobServiceError::Invalid)?;

        // Submissions without an input mapping get every default
        let input = match input {
            JsonValue::Null => JsonValue::Object(Default::default()),
            other => other,
        };

        let parsed = match job_type {
            JobType::TextToSpeech => serde_json::from_value(input).map(JobInput::TextToSpeech),
            JobType::VoiceClone => serde_json::from_value(input).map(JobInput::VoiceClone),
            JobType::SpeechTranslation => {
                serde_json::from_value(input).map(JobInput::SpeechTranslation)
            }
        };

        parsed.map_err(|e| {
            JobServiceError::Invalid(format!("Invalid input for {}: {}", job_type, e))
        })
    }

    pub fn job_type(&self) -> JobType {
        match self {
            JobInput::TextToSpeech(_) => JobType::TextToSpeech,
            JobInput::VoiceClone(_) => JobType::VoiceClone,
            JobInput::SpeechTranslation(_) => JobType::SpeechTranslation,
        }
    }
}
