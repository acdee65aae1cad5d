use crate::errors::{RepoError, StorageError};
use crate::models::{Meme, NewMeme};
use crate::schemas::MemeUpdate;
use async_trait::async_trait;

/// Trait defining operations for storing and retrieving Meme metadata.
#[async_trait]
pub trait MemeRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// Lists memes ordered by id, skipping `offset` rows and returning at most `limit`.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Meme>, RepoError>;

    /// Retrieves a meme by id. Returns Ok(None) if the meme is not found.
    async fn get_by_id(&self, id: i64) -> Result<Option<Meme>, RepoError>;

    /// Inserts a meme and returns it with its assigned id.
    async fn create(&self, meme: &NewMeme) -> Result<Meme, RepoError>;

    /// Applies the fields present in `update`. Returns Ok(None) if the meme is not found.
    async fn update(&self, id: i64, update: &MemeUpdate) -> Result<Option<Meme>, RepoError>;

    /// Removes a meme and returns its last state. Returns Ok(None) if the meme is not found.
    async fn delete(&self, id: i64) -> Result<Option<Meme>, RepoError>;
}

/// Trait defining operations for storing meme images.
#[async_trait]
pub trait FileStorage: Send + Sync + 'static {
    /// Uploads file data under `file_name` and returns the public URL of the object.
    async fn upload(&self, file_name: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
}
