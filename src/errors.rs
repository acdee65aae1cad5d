use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database backend error: {0}")]
    BackendError(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Error uploading file: {0}")]
    UploadFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(#[from] anyhow::Error),
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Error processing multipart form data: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
    #[error("Invalid meme ID: {0}")]
    InvalidId(String),

    // Carries the exact detail each endpoint reports.
    #[error("{0}")]
    NotFound(String),

    #[error("Could not access meme data")]
    RepositoryError(#[source] RepoError),
    #[error("Could not perform file storage operation")]
    StorageError(#[source] StorageError),

    // Configuration / Startup errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Initialization error: {0}")]
    InitError(String),
    #[error("Server error: {0}")]
    ServerError(#[from] std::io::Error),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::RepositoryError(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageError(err)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

/// Detail reported whenever an uploaded image is over the size cap.
pub fn file_too_large_detail() -> String {
    format!(
        "File size exceeds the maximum limit of {} MB",
        crate::config::MAX_FILE_SIZE / (1024 * 1024)
    )
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // A body over the request limit is an oversized image as far as the client is concerned.
            AppError::MultipartError(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                (StatusCode::BAD_REQUEST, file_too_large_detail())
            }
            AppError::MultipartError(e) => (StatusCode::BAD_REQUEST, format!("Invalid multipart form data: {}", e)),
            AppError::InvalidId(raw) => (StatusCode::BAD_REQUEST, format!("Invalid meme id: {}", raw)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),

            // 5xx Server Errors
            AppError::RepositoryError(e) => {
                tracing::error!(error.source = ?e, "Repository error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database operation failed".to_string())
            }
            // The storage message is surfaced to the client as-is.
            AppError::StorageError(e) => {
                tracing::error!(error.source = ?e, "Storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::ConfigError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error".to_string())
            }
            AppError::InitError(msg) => {
                tracing::error!("Initialization error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server initialization error".to_string())
            }
            AppError::ServerError(e) => {
                tracing::error!(error = %e, "I/O error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal server error occurred".to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(error.detail = %detail, error.status = %status, "Responding with error");
        } else {
            tracing::warn!(error.detail = %detail, error.status = %status, "Rejecting request");
        }

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
