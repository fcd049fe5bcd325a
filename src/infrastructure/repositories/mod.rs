pub mod audio_storage_repository;
pub mod job_repository;
pub mod postgres_job_repository;
pub mod postgres_usage_repository;
pub mod supabase_storage_repository;
pub mod synthesis_repository;
pub mod usage_repository;
pub mod xtts_synthesis_repository;

pub use audio_storage_repository::AudioStorageRepository;
pub use job_repository::JobRepository;
pub use postgres_job_repository::PostgresJobRepository;
pub use postgres_usage_repository::PostgresUsageRepository;
pub use supabase_storage_repository::SupabaseStorageRepository;
pub use synthesis_repository::{SynthesisRepository, SynthesisRequest};
pub use usage_repository::UsageRepository;
pub use xtts_synthesis_repository::XttsSynthesisRepository;
