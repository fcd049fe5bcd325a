use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{health, job::JobController};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};

/// Build the application router with all routes and layers
pub fn build_router(pool: Arc<DbPool>, job_controller: Arc<JobController>) -> Router {
    let job_routes = Router::new()
        .route("/process-job", post(JobController::process_job))
        .route("/job/:job_id/status", get(JobController::get_job_status))
        .with_state(job_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(job_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    job_controller: Arc<JobController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(pool, job_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
