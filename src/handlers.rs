//! Meme endpoints. Every record in a response is a full [`Meme`]: `title`,
//! `description` and `image_url` plus the database `id`, which clients need
//! to address the record in later `GET`/`PUT`/`DELETE` calls.

use crate::{
    config::{ALLOWED_IMAGE_TYPES, MAX_FILE_SIZE},
    errors::{file_too_large_detail, AppError},
    models::{Meme, NewMeme},
    schemas::{MemeIn, MemeUpdate},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// An uploaded image as read from the multipart body.
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>().map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// GET /memes/
pub async fn list_memes(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Meme>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    if params.offset < 0 {
        return Err(AppError::InvalidInput("offset must be greater than or equal to 0".to_string()));
    }

    tracing::debug!(offset = params.offset, limit = params.limit, "Listing memes via handler");
    let memes = state.meme_repo.list(params.offset, params.limit).await?;
    Ok(Json(memes))
}

/// GET /memes/{id}
pub async fn get_meme(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<Meme>, AppError> {
    let meme_id = parse_id(&id_str)?;
    tracing::debug!(meme_id, "Fetching meme details via handler");
    state
        .meme_repo
        .get_by_id(meme_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
}

/// POST /memes/
///
/// Expects a `meme` field holding the JSON metadata and a `file` field with
/// the image. Everything is validated before the image is uploaded.
pub async fn create_meme(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Meme>, AppError> {
    let mut meme_raw: Option<String> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        match field_name.as_str() {
            "meme" => meme_raw = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().map(|m| m.to_string());
                let data = field.bytes().await?.to_vec();
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => tracing::debug!("Ignoring unknown multipart field: {}", field_name),
        }
    }

    let meme_raw = meme_raw.ok_or_else(|| AppError::InvalidInput("Missing form field: meme".to_string()))?;
    let meme = parse_meme_in(&meme_raw)?;

    let file = file.ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;
    let file_name = file
        .file_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidInput("No file uploaded".to_string()))?;

    // Fall back to the filename extension when the part has no Content-Type.
    let content_type = file
        .content_type
        .or_else(|| mime_guess::from_path(&file_name).first_raw().map(|s| s.to_string()))
        .unwrap_or_default();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid image type. The allowed image types are {}",
            ALLOWED_IMAGE_TYPES.join(", ")
        )));
    }
    if file.data.len() > MAX_FILE_SIZE {
        return Err(AppError::InvalidInput(file_too_large_detail()));
    }

    let image_url = state
        .file_storage
        .upload(&file_name, file.data, &content_type)
        .await?;

    let created = state
        .meme_repo
        .create(&NewMeme {
            title: meme.title,
            description: meme.description,
            image_url,
        })
        .await?;

    tracing::info!(meme_id = created.id, image_url = %created.image_url, "Meme created successfully via handler");
    Ok(Json(created))
}

fn parse_meme_in(raw: &str) -> Result<MemeIn, AppError> {
    let meme: MemeIn = serde_json::from_str(raw)
        .map_err(|e| AppError::InvalidInput(format!("Invalid meme metadata: {}", e)))?;
    if meme.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }
    Ok(meme)
}

/// PUT /memes/{id}
pub async fn update_meme(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    body: Result<Json<MemeUpdate>, JsonRejection>,
) -> Result<Json<Meme>, AppError> {
    let meme_id = parse_id(&id_str)?;
    let Json(update) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    if update.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }

    tracing::debug!(meme_id, ?update, "Updating meme via handler");
    let not_found = || AppError::NotFound(format!("Meme with id {} is not found", meme_id));

    // Nothing to change: still report 404 for unknown ids, otherwise echo the record.
    let updated = if update.is_empty() {
        state.meme_repo.get_by_id(meme_id).await?
    } else {
        state.meme_repo.update(meme_id, &update).await?
    };

    let meme = updated.ok_or_else(not_found)?;
    tracing::info!(meme_id, "Meme updated successfully via handler");
    Ok(Json(meme))
}

/// DELETE /memes/{id}
///
/// Only the record is removed; the image object stays in the bucket.
pub async fn delete_meme(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<Meme>, AppError> {
    let meme_id = parse_id(&id_str)?;
    tracing::debug!(meme_id, "Deleting meme via handler");

    let deleted = state
        .meme_repo
        .delete(meme_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Meme with id {} not found", meme_id)))?;

    tracing::info!(meme_id, "Meme deleted successfully via handler");
    Ok(Json(deleted))
}
