use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use vane::api;
use vane::auth::AuthService;
use vane::config::{Config, DatabaseBackend};
use vane::provider::OpenWeatherClient;
use vane::storage::{PostgresStorage, SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(
                PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
    };

    // Initialize database
    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    // Upstream weather client
    let weather = Arc::new(OpenWeatherClient::new(&config.openweather)?);
    info!("Using weather source: {}", config.openweather.base_url);

    // Auth service
    let auth_service = Arc::new(AuthService::new(&config.auth));
    info!(
        "🔐 JWT authentication enabled (issuer: {}, audience: {})",
        config.auth.issuer, config.auth.audience
    );

    // Create router
    let router = api::create_api_router(
        Arc::clone(&storage),
        weather,
        auth_service,
        config.frontend.clone(),
    );

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving frontend from directory: {}", static_dir);
    }

    // Start API server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 API server listening on http://{}", addr);
    info!("   - API endpoints available at http://{}/api/...", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
