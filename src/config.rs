use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

/// MIME types accepted for meme images.
pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Largest accepted image, in bytes.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Request body limit. Kept above `MAX_FILE_SIZE` so oversized images are
/// rejected by the handler with a readable message instead of a bare 413.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,

    pub postgres_host: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_port: u16,
    pub postgres_db: String,

    pub minio_host: String,
    pub minio_port: u16,
    pub minio_root_user: String,
    pub minio_root_password: String,
    pub minio_bucket_name: String,
    pub minio_region: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingVar(key.into()));

        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let postgres_port = parse_port(&lookup, "POSTGRES_PORT", 5432)?;
        let minio_port = parse_port(&lookup, "MINIO_PORT", 9000)?;

        Ok(Config {
            bind_address,
            postgres_host: required("POSTGRES_HOST")?,
            postgres_user: required("POSTGRES_USER")?,
            postgres_password: required("POSTGRES_PASSWORD")?,
            postgres_port,
            postgres_db: required("POSTGRES_DB")?,
            minio_host: required("MINIO_HOST")?,
            minio_port,
            minio_root_user: required("MINIO_ROOT_USER")?,
            minio_root_password: required("MINIO_ROOT_PASSWORD")?,
            minio_bucket_name: required("MINIO_BUCKET_NAME")?,
            minio_region: lookup("MINIO_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        })
    }

    /// Connection string for the PostgreSQL database.
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.postgres_user, self.postgres_password, self.postgres_host, self.postgres_port, self.postgres_db
        )
    }

    /// Base URL of the object storage endpoint, without a trailing slash.
    pub fn storage_base_url(&self) -> String {
        format!("http://{}:{}", self.minio_host, self.minio_port)
    }
}

fn parse_port<F>(lookup: &F, key: &str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidVar(key.into(), e.to_string())),
        None => Ok(default),
    }
}
