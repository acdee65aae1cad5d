//! HTTP service for meme records: metadata in PostgreSQL, images in
//! S3-compatible object storage.

pub mod aws_clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schemas;
pub mod startup;
pub mod storage;

use domain::{FileStorage, MemeRepository};
use std::sync::Arc;

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub meme_repo: Arc<dyn MemeRepository>,
    pub file_storage: Arc<dyn FileStorage>,
}
