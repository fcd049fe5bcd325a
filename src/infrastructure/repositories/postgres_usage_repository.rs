use super::usage_repository::UsageRepository;
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Usage tracking on the `profiles` table
pub struct PostgresUsageRepository {
    pool: Arc<DbPool>,
}

impl PostgresUsageRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageRepository for PostgresUsageRepository {
    async fn record_usage(&self, user_id: &str, minutes: f64) -> AppResult<()> {
        let pool = self.pool.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET usage_this_month = usage_this_month + $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(minutes)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Profile {}", user_id)));
        }

        tracing::info!(user_id = %user_id, minutes = minutes, "Updated user usage");

        Ok(())
    }
}
