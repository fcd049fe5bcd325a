use super::synthesis_repository::{SynthesisRepository, SynthesisRequest};
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;

/// Voice cloning always speaks English, as the model's cloning path does
const CLONE_LANGUAGE: &str = "en";

/// Stock voices known to the model server. `default` uses the model's own
/// speaker; the others are forwarded by name.
const KNOWN_VOICES: &[&str] = &["default", "female-1", "male-1"];

#[derive(Debug, Serialize)]
struct XttsRequest<'a> {
    text: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker_wav: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emotion: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pitch: Option<f32>,
}

/// XTTS inference server implementation of the synthesis repository
pub struct XttsSynthesisRepository {
    http_client: reqwest::Client,
    base_url: String,
}

impl XttsSynthesisRepository {
    pub fn new(base_url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Speaker name to send for a voice id, `None` for the model default
    fn speaker_for_voice(voice_id: &str) -> Option<&str> {
        if !KNOWN_VOICES.contains(&voice_id) {
            tracing::warn!(voice_id = voice_id, "Unknown voice id, forwarding as speaker name");
        }
        match voice_id {
            "default" => None,
            other => Some(other),
        }
    }

    async fn call_model(&self, request: &XttsRequest<'_>) -> Result<Vec<u8>, String> {
        tracing::info!(
            language = request.language,
            speaker = ?request.speaker,
            cloned = request.speaker_wav.is_some(),
            text_length = request.text.len(),
            text_preview = %request.text.chars().take(200).collect::<String>(),
            "Calling XTTS model server"
        );

        let response = self
            .http_client
            .post(format!("{}/tts", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "XTTS request failed");
                format!("Speech synthesis failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                error = %error_text,
                "XTTS model server returned an error"
            );
            return Err(format!(
                "Speech synthesis failed ({}): {}",
                status.as_u16(),
                error_text
            ));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read synthesized audio: {}", e))?
            .to_vec();

        tracing::debug!(audio_size = audio_bytes.len(), "XTTS audio received");

        Ok(audio_bytes)
    }
}

#[async_trait]
impl SynthesisRepository for XttsSynthesisRepository {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let body = XttsRequest {
            text: &request.text,
            language: &request.language,
            speaker: Self::speaker_for_voice(&request.voice_id),
            speaker_wav: None,
            emotion: Some(&request.emotion),
            speed: Some(request.speed),
            pitch: Some(request.pitch),
        };

        let audio_data = self.call_model(&body).await?;

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "xtts",
            voice_id = %request.voice_id,
            latency_ms = duration.as_millis(),
            characters_count = request.text.len(),
            audio_size_bytes = audio_data.len(),
            "Speech synthesis completed"
        );

        Ok(audio_data)
    }

    async fn clone_voice(&self, reference_audio: &[u8], text: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let body = XttsRequest {
            text,
            language: CLONE_LANGUAGE,
            speaker: None,
            speaker_wav: Some(base64::engine::general_purpose::STANDARD.encode(reference_audio)),
            emotion: None,
            speed: None,
            pitch: None,
        };

        let audio_data = self.call_model(&body).await?;

        tracing::info!(
            provider = "xtts",
            latency_ms = start_time.elapsed().as_millis(),
            reference_size_bytes = reference_audio.len(),
            audio_size_bytes = audio_data.len(),
            "Voice cloning completed"
        );

        Ok(audio_data)
    }
}
