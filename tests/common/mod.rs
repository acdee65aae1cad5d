#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use memes_api::domain::{FileStorage, MemeRepository};
use memes_api::errors::{RepoError, StorageError};
use memes_api::models::{Meme, NewMeme};
use memes_api::routes::create_router;
use memes_api::schemas::MemeUpdate;
use memes_api::storage::object_url;
use memes_api::AppState;

pub const STORAGE_BASE_URL: &str = "http://minio.test:9000";
pub const BUCKET: &str = "memes";

/// Repository fake keeping rows in memory, ids assigned from 1.
#[derive(Default)]
pub struct InMemoryMemeRepository {
    rows: Mutex<BTreeMap<i64, Meme>>,
    next_id: Mutex<i64>,
}

impl InMemoryMemeRepository {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl MemeRepository for InMemoryMemeRepository {
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Meme>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Meme>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, meme: &NewMeme) -> Result<Meme, RepoError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = Meme {
            id: *next_id,
            title: meme.title.clone(),
            description: meme.description.clone(),
            image_url: meme.image_url.clone(),
        };
        self.rows.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, update: &MemeUpdate) -> Result<Option<Meme>, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(meme) = rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            meme.title = title.clone();
        }
        if let Some(description) = &update.description {
            meme.description = description.clone();
        }
        Ok(Some(meme.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Meme>, RepoError> {
        Ok(self.rows.lock().unwrap().remove(&id))
    }
}

/// Storage fake that records every upload and can be told to fail.
#[derive(Default)]
pub struct RecordingStorage {
    uploads: Mutex<Vec<(String, String, usize)>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingStorage {
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl FileStorage for RecordingStorage {
    async fn upload(&self, file_name: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(StorageError::UploadFailed(message));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), content_type.to_string(), data.len()));
        Ok(object_url(STORAGE_BASE_URL, BUCKET, file_name))
    }
}

pub struct TestResponse {
    pub status: u16,
    pub body: Value,
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub repo: Arc<InMemoryMemeRepository>,
    pub storage: Arc<RecordingStorage>,
}

impl TestApp {
    /// Serves the real router on an ephemeral port, backed by the fakes above.
    pub async fn spawn() -> Self {
        let repo = Arc::new(InMemoryMemeRepository::default());
        let storage = Arc::new(RecordingStorage::default());
        let state = Arc::new(AppState {
            meme_repo: repo.clone(),
            file_storage: storage.clone(),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let app = create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            repo,
            storage,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn into_test_response(res: reqwest::Response) -> TestResponse {
        let status = res.status().as_u16();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self.client.get(self.url(path)).send().await.expect("GET failed");
        Self::into_test_response(res).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT failed");
        Self::into_test_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self.client.delete(self.url(path)).send().await.expect("DELETE failed");
        Self::into_test_response(res).await
    }

    pub async fn post_form(&self, form: Form) -> TestResponse {
        let res = self
            .client
            .post(self.url("/memes/"))
            .multipart(form)
            .send()
            .await
            .expect("POST failed");
        Self::into_test_response(res).await
    }

    /// Posts a meme with the metadata JSON-encoded in the `meme` field.
    pub async fn create_meme(&self, meta: &Value, file_name: &str, data: Vec<u8>, mime: &str) -> TestResponse {
        let file = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .expect("Invalid MIME type");
        let form = Form::new().text("meme", meta.to_string()).part("file", file);
        self.post_form(form).await
    }

    /// Creates a meme and returns its id, panicking if creation fails.
    pub async fn seed_meme(&self, title: &str, description: Option<&str>, file_name: &str) -> i64 {
        let meta = serde_json::json!({ "title": title, "description": description });
        let res = self.create_meme(&meta, file_name, b"PNG_DATA".to_vec(), "image/png").await;
        assert_eq!(res.status, 200, "seeding failed: {}", res.body);
        res.body["id"].as_i64().expect("created meme has no id")
    }
}
