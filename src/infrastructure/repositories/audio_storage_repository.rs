use async_trait::async_trait;

/// Repository for produced audio files.
///
/// Implementations store WAV payloads under a logical path and hand back a
/// publicly resolvable location. A failed upload must surface as an error.
#[async_trait]
pub trait AudioStorageRepository: Send + Sync {
    /// Store `audio` at `path` (without extension) and return its public URL
    ///
    /// # Arguments
    /// * `audio` - WAV bytes produced by the synthesis model
    /// * `path` - logical path namespaced by owner, e.g. `user-42/cloned/job-1`
    async fn upload_audio(&self, audio: &[u8], path: &str) -> Result<String, String>;
}
