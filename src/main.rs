use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use speecher_backend::controllers::job::JobController;
use speecher_backend::domain::job::JobProcessor;
use speecher_backend::infrastructure::config::{Config, LogFormat};
use speecher_backend::infrastructure::db::{check_connection, create_pool};
use speecher_backend::infrastructure::http::start_http_server;
use speecher_backend::infrastructure::repositories::{
    PostgresJobRepository, PostgresUsageRepository, SupabaseStorageRepository,
    XttsSynthesisRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Speecher job service on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        environment = ?config.environment,
        storage_bucket = %config.storage_bucket,
        synthesis_url = %config.synthesis_url,
        usage_tracking_enabled = config.usage_tracking_enabled,
        "Configuration loaded"
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool and gateway endpoints)
    tracing::info!("Instantiating repositories...");
    let job_repo = Arc::new(PostgresJobRepository::new(pool.clone()));
    let storage_repo = Arc::new(SupabaseStorageRepository::new(
        config.supabase_url.clone(),
        config.supabase_service_role_key.clone(),
        config.storage_bucket.clone(),
    ));
    let synthesis_repo = Arc::new(XttsSynthesisRepository::new(config.synthesis_url.clone()));

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let mut job_processor = JobProcessor::new(job_repo.clone(), storage_repo, synthesis_repo);
    if config.usage_tracking_enabled {
        let usage_repo = Arc::new(PostgresUsageRepository::new(pool.clone()));
        job_processor = job_processor.with_usage_tracking(usage_repo);
    }
    let job_processor = Arc::new(job_processor);

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let job_controller = Arc::new(JobController::new(job_processor, job_repo));

    // Start HTTP server with all routes
    start_http_server(pool, config, job_controller).await?;

    tracing::info!("Speecher job service shut down");

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "speecher_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
