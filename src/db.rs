use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing;

/// The name of the table used for memes.
pub const MEMES_TABLE: &str = "memes";

/// Opens the connection pool. Pool sizing and timeouts are the driver defaults.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")
}

/// Creates the `memes` table and its title index if they do not already exist.
pub async fn create_memes_table(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memes (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            image_url TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context(format!("Failed to create table '{}'", MEMES_TABLE))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS ix_memes_title ON memes (title)")
        .execute(pool)
        .await
        .context(format!("Failed to create title index on '{}'", MEMES_TABLE))?;

    tracing::info!("Table '{}' created successfully or already existed.", MEMES_TABLE);
    Ok(())
}
