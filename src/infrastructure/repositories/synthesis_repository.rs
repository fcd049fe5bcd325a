use async_trait::async_trait;

/// Parameters of a single synthesis call
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub language: String,
    pub emotion: String,
    pub speed: f32,
    pub pitch: f32,
}

impl SynthesisRequest {
    /// Request with the default voice, emotion and rates
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: "default".to_string(),
            language: language.into(),
            emotion: "neutral".to_string(),
            speed: 1.0,
            pitch: 1.0,
        }
    }
}

/// Repository for the pretrained speech model.
/// Abstracts where the model runs (local inference server, hosted endpoint, ...)
///
/// Both operations are long-running single calls returning a complete WAV
/// payload; there is no streaming interface.
#[async_trait]
pub trait SynthesisRepository: Send + Sync {
    /// Synthesize already prepared text with a stock voice
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, String>;

    /// Speak `text` in the voice of `reference_audio`
    async fn clone_voice(&self, reference_audio: &[u8], text: &str) -> Result<Vec<u8>, String>;
}
