use memes_api::{
    aws_clients::{create_s3_client, create_sdk_config},
    config::Config,
    db,
    errors::AppError,
    repositories::PgMemeRepository,
    routes::create_router,
    startup::init_resources,
    storage::S3FileStorage,
    AppState,
};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "memes_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::load()?;
    tracing::info!(bind_address = %config.bind_address, bucket = %config.minio_bucket_name, "Configuration loaded");

    // --- Backing services ---
    tracing::info!("Connecting to PostgreSQL...");
    let pool = db::connect(&config.database_url())
        .await
        .map_err(|e| AppError::InitError(format!("{:#}", e)))?;

    tracing::info!("Initializing object storage client...");
    let sdk_config = create_sdk_config(&config).await;
    let storage = S3FileStorage::new(
        create_s3_client(&sdk_config),
        config.minio_bucket_name.clone(),
        config.storage_base_url(),
    );

    init_resources(&pool, &storage, &config).await?;

    // --- Application State ---
    let state = Arc::new(AppState {
        meme_repo: Arc::new(PgMemeRepository::new(pool)),
        file_storage: Arc::new(storage),
    });

    let app = create_router(state);

    // --- Server Startup ---
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    tracing::info!("Server listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
