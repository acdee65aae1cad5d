use serde::{Deserialize, Serialize};

/// A meme row as stored in the `memes` table. Also the response body of
/// every endpoint, so `id` is serialized alongside the other fields.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Meme {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
}

/// Everything needed to insert a meme; the id is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewMeme {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
}
