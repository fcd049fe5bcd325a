use super::audio_storage_repository::AudioStorageRepository;
use async_trait::async_trait;

const AUDIO_CONTENT_TYPE: &str = "audio/wav";
const AUDIO_EXTENSION: &str = "wav";

/// Supabase Storage implementation of the audio repository
pub struct SupabaseStorageRepository {
    http_client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorageRepository {
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    /// Object key inside the bucket, with every path segment percent-encoded
    fn object_path(path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}.{}", encoded.join("/"), AUDIO_EXTENSION)
    }

    fn upload_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_path
        )
    }

    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_path
        )
    }
}

#[async_trait]
impl AudioStorageRepository for SupabaseStorageRepository {
    async fn upload_audio(&self, audio: &[u8], path: &str) -> Result<String, String> {
        let object_path = Self::object_path(path);

        tracing::debug!(
            bucket = %self.bucket,
            object_path = %object_path,
            audio_size_bytes = audio.len(),
            "Uploading audio to storage"
        );

        // Re-running a job overwrites its previous output
        let response = self
            .http_client
            .post(self.upload_url(&object_path))
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
            .header("Content-Type", AUDIO_CONTENT_TYPE)
            .header("x-upsert", "true")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, object_path = %object_path, "Storage upload request failed");
                format!("Upload failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = status.as_u16(),
                object_path = %object_path,
                error = %error_text,
                "Storage upload rejected"
            );
            return Err(format!("Upload failed ({}): {}", status.as_u16(), error_text));
        }

        tracing::info!(object_path = %object_path, "Audio uploaded successfully");

        Ok(self.public_url(&object_path))
    }
}
