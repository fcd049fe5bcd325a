use crate::error::AppResult;
use async_trait::async_trait;

/// Repository for per-user monthly usage
#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Add `minutes` to the user's usage for the current month
    async fn record_usage(&self, user_id: &str, minutes: f64) -> AppResult<()>;
}
