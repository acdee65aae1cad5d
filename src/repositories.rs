use crate::{
    domain::MemeRepository,
    errors::RepoError,
    models::{Meme, NewMeme},
    schemas::MemeUpdate,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{self, info};

const MEME_COLUMNS: &str = "id, title, description, image_url";

/// PostgreSQL-backed meme repository.
///
/// Every operation checks out its own pooled connection; the connection goes
/// back to the pool when it is dropped at the end of the call, whether the
/// query succeeded or not.
#[derive(Debug, Clone)]
pub struct PgMemeRepository {
    pool: PgPool,
}

impl PgMemeRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing PgMemeRepository");
        Self { pool }
    }
}

#[async_trait]
impl MemeRepository for PgMemeRepository {
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Meme>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let memes = sqlx::query_as::<_, Meme>(&format!(
            "SELECT {MEME_COLUMNS} FROM memes ORDER BY id OFFSET $1 LIMIT $2"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        tracing::debug!(offset, limit, count = memes.len(), "Postgres: Listed memes");
        Ok(memes)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Meme>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let meme = sqlx::query_as::<_, Meme>(&format!("SELECT {MEME_COLUMNS} FROM memes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(meme)
    }

    async fn create(&self, meme: &NewMeme) -> Result<Meme, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let created = sqlx::query_as::<_, Meme>(&format!(
            "INSERT INTO memes (title, description, image_url) VALUES ($1, $2, $3) RETURNING {MEME_COLUMNS}"
        ))
        .bind(&meme.title)
        .bind(&meme.description)
        .bind(&meme.image_url)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(meme_id = created.id, "Postgres: Inserted meme");
        Ok(created)
    }

    async fn update(&self, id: i64, update: &MemeUpdate) -> Result<Option<Meme>, RepoError> {
        // $3 says whether the description was supplied at all; $4 is its new value (possibly NULL).
        let mut conn = self.pool.acquire().await?;
        let updated = sqlx::query_as::<_, Meme>(&format!(
            "UPDATE memes SET \
                title = COALESCE($2, title), \
                description = CASE WHEN $3 THEN $4 ELSE description END \
             WHERE id = $1 RETURNING {MEME_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.title)
        .bind(update.description.is_some())
        .bind(update.description.clone().flatten())
        .fetch_optional(&mut *conn)
        .await?;

        tracing::debug!(meme_id = id, found = updated.is_some(), "Postgres: Update executed");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<Option<Meme>, RepoError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = sqlx::query_as::<_, Meme>(&format!("DELETE FROM memes WHERE id = $1 RETURNING {MEME_COLUMNS}"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        tracing::debug!(meme_id = id, found = deleted.is_some(), "Postgres: Delete executed");
        Ok(deleted)
    }
}
