use anyhow::{bail, Result};
use axum::Router;
use hyper::StatusCode;
use once_cell::sync::Lazy;
use serde_json::Value;
use speecher_backend::infrastructure::config::{Config, Environment, LogFormat};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use test_context::AsyncTestContext;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};


use api_client::TestClient;
use db_pool::{DatabasePool, PooledDatabase};
use fixtures::TestFixtures;

pub const STORAGE_BUCKET: &str = "audio-outputs";

/// Size of the fake WAV payload returned by the model mock (100 ms estimated)
pub const FAKE_AUDIO_LEN: usize = 4800;

// Docker client for test containers
static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

// Shared PostgreSQL container for all tests
static SHARED_CONTAINER: Lazy<SharedContainer> = Lazy::new(SharedContainer::new);

// Global database pool
static DB_POOL: Lazy<DatabasePool> = Lazy::new(|| DatabasePool::new(SHARED_CONTAINER.port));

/// Shared container that lives for the duration of all tests
struct SharedContainer {
    _container: Container<'static, Postgres>,
    port: u16,
}

impl SharedContainer {
    fn new() -> Self {
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        println!("🐳 Started shared PostgreSQL container on port {}", port);

        Self {
            _container: container,
            port,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    #[allow(dead_code)]
    pub pool: PgPool,
    #[allow(dead_code)]
    pub config: Config,
    pub fixtures: TestFixtures,
    pub storage_server: MockServer,
    pub synthesis_server: MockServer,
    _db: PooledDatabase,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            // Get a database from the shared pool
            let pooled_db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");

            let storage_server = MockServer::start().await;
            let synthesis_server = MockServer::start().await;

            // Create test configuration
            let config = Config {
                database_url: pooled_db.database_url.clone(),
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                supabase_url: storage_server.uri(),
                supabase_service_role_key: "test-service-role-key".to_string(),
                storage_bucket: STORAGE_BUCKET.to_string(),
                synthesis_url: synthesis_server.uri(),
                usage_tracking_enabled: true,
            };

            let app = create_app(config.clone(), pooled_db.pool.clone());

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            let client = TestClient::new(&base_url);
            let fixtures = TestFixtures::new(pooled_db.pool.clone());

            Self {
                client,
                pool: pooled_db.pool.clone(),
                config,
                fixtures,
                storage_server,
                synthesis_server,
                _db: pooled_db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Database cleanup happens automatically via Drop on PooledDatabase
        }
    }
}

impl TestContext {
    /// Model server answering every synthesis call with a fixed WAV payload
    pub async fn mock_synthesis_ok(&self) {
        Mock::given(method("POST"))
            .and(path("/tts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; FAKE_AUDIO_LEN])
                    .insert_header("content-type", "audio/wav"),
            )
            .mount(&self.synthesis_server)
            .await;
    }

    pub async fn mock_synthesis_error(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/tts"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.synthesis_server)
            .await;
    }

    /// Storage bucket accepting every upload
    pub async fn mock_storage_ok(&self) {
        Mock::given(method("POST"))
            .and(path_regex(format!(
                r"^/storage/v1/object/{}/.+\.wav$",
                STORAGE_BUCKET
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Key": "uploaded"
            })))
            .mount(&self.storage_server)
            .await;
    }

    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.storage_server.uri(),
            STORAGE_BUCKET,
            object_path
        )
    }

    /// Model server answering after `delay`, long enough to read the row mid-run
    pub async fn mock_synthesis_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/tts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; FAKE_AUDIO_LEN])
                    .set_delay(delay),
            )
            .mount(&self.synthesis_server)
            .await;
    }

    /// Poll the status route until the job is processing at `progress`
    pub async fn wait_for_progress(&self, job_id: &str, progress: u64) -> Result<Value> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);

        loop {
            let response = self
                .client
                .get(&format!("/job/{}/status", job_id))
                .await?;

            if response.status == StatusCode::OK {
                if let Some(body) = response.body {
                    if body["status"] == "processing" && body["progress"].as_u64() == Some(progress)
                    {
                        return Ok(body);
                    }
                }
            }

            if tokio::time::Instant::now() >= deadline {
                bail!("job {} never reported progress {}", job_id, progress);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Poll the status route until the job reaches a terminal status
    pub async fn wait_for_terminal(&self, job_id: &str) -> Result<Value> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);

        loop {
            let response = self
                .client
                .get(&format!("/job/{}/status", job_id))
                .await?;

            if response.status == StatusCode::OK {
                if let Some(body) = response.body {
                    match body.get("status").and_then(|s| s.as_str()) {
                        Some("completed") | Some("failed") => return Ok(body),
                        _ => {}
                    }
                }
            }

            if tokio::time::Instant::now() >= deadline {
                bail!("job {} did not reach a terminal status in time", job_id);
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

fn create_app(config: Config, pool: PgPool) -> Router {
    use speecher_backend::{
        controllers::job::JobController,
        domain::job::JobProcessor,
        infrastructure::{
            http::build_router,
            repositories::{
                PostgresJobRepository, PostgresUsageRepository, SupabaseStorageRepository,
                XttsSynthesisRepository,
            },
        },
    };

    let pool = Arc::new(pool);

    // Instantiate repositories
    let job_repo = Arc::new(PostgresJobRepository::new(pool.clone()));
    let usage_repo = Arc::new(PostgresUsageRepository::new(pool.clone()));
    let storage_repo = Arc::new(SupabaseStorageRepository::new(
        config.supabase_url.clone(),
        config.supabase_service_role_key.clone(),
        config.storage_bucket.clone(),
    ));
    let synthesis_repo = Arc::new(XttsSynthesisRepository::new(config.synthesis_url.clone()));

    // Instantiate services
    let job_processor = Arc::new(
        JobProcessor::new(job_repo.clone(), storage_repo, synthesis_repo)
            .with_usage_tracking(usage_repo),
    );

    // Instantiate controllers
    let job_controller = Arc::new(JobController::new(job_processor, job_repo));

    build_router(pool, job_controller)
}
