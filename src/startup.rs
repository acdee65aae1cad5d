use crate::{config::Config, db, errors::AppError, storage::S3FileStorage};
use sqlx::PgPool;
use tracing;

/// Initializes required backing resources (memes table, storage bucket).
pub async fn init_resources(pool: &PgPool, storage: &S3FileStorage, config: &Config) -> Result<(), AppError> {
    tracing::info!("Startup: Initializing backing resources...");

    db::create_memes_table(pool)
        .await
        .map_err(|e| AppError::InitError(format!("{:#}", e)))?;

    storage
        .ensure_bucket(&config.minio_region)
        .await
        .map_err(|e| AppError::InitError(format!("Startup: bucket '{}': {}", config.minio_bucket_name, e)))?;

    tracing::info!("Startup: Resource initialization complete.");
    Ok(())
}
