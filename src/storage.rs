use crate::{domain::FileStorage, errors::StorageError};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client as S3Client,
};
use tracing;

/// Error codes that mean the bucket is already there and usable.
const BUCKET_EXISTS_CODES: [&str; 2] = ["BucketAlreadyOwnedByYou", "BucketAlreadyExists"];

#[derive(Debug, Clone)]
pub struct S3FileStorage {
    client: S3Client,
    bucket_name: String,
    base_url: String,
}

impl S3FileStorage {
    pub fn new(client: S3Client, bucket_name: String, base_url: String) -> Self {
        Self {
            client,
            bucket_name,
            base_url,
        }
    }

    /// Creates the bucket unless it already exists. Any other failure
    /// (bad credentials, unreachable endpoint) is returned to the caller.
    pub async fn ensure_bucket(&self, region: &str) -> Result<(), StorageError> {
        let mut request = self.client.create_bucket().bucket(&self.bucket_name);
        if region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket_name, "Startup: S3 bucket created");
                Ok(())
            }
            Err(SdkError::ServiceError(service_err)) if is_bucket_exists(service_err.err().code()) => {
                tracing::info!(bucket = %self.bucket_name, "Startup: S3 bucket already exists");
                Ok(())
            }
            Err(sdk_err) => {
                tracing::error!(bucket = %self.bucket_name, error = %sdk_err, "Startup: Failed to create S3 bucket");
                Err(StorageError::BackendError(
                    anyhow::Error::new(sdk_err).context(format!("Failed to create bucket '{}'", self.bucket_name)),
                ))
            }
        }
    }
}

/// Whether a CreateBucket error code means the bucket is already usable.
pub fn is_bucket_exists(code: Option<&str>) -> bool {
    code.is_some_and(|code| BUCKET_EXISTS_CODES.contains(&code))
}

/// Public URL of an object stored under `file_name`.
pub fn object_url(base_url: &str, bucket_name: &str, file_name: &str) -> String {
    format!("{}/{}/{}", base_url.trim_end_matches('/'), bucket_name, file_name)
}

#[async_trait]
impl FileStorage for S3FileStorage {
    /// Uploads data to S3 using PutObject. Same key overwrites the previous object.
    async fn upload(&self, file_name: &str, data: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        tracing::debug!(s3_key = %file_name, bucket = %self.bucket_name, %content_type, size = data.len(), "S3: Uploading file");

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(file_name)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .context(format!("S3: Failed to upload object with key '{}'", file_name))
            .map_err(|e| StorageError::UploadFailed(format!("{:#}", e)))?;

        let url = object_url(&self.base_url, &self.bucket_name, file_name);
        tracing::debug!(s3_key = %file_name, %url, "S3: Upload successful");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_joins_base_bucket_and_name() {
        assert_eq!(
            object_url("http://minio:9000", "memes", "cat.png"),
            "http://minio:9000/memes/cat.png"
        );
    }

    #[test]
    fn only_already_exists_codes_are_ignored() {
        assert!(is_bucket_exists(Some("BucketAlreadyOwnedByYou")));
        assert!(is_bucket_exists(Some("BucketAlreadyExists")));

        assert!(!is_bucket_exists(Some("AccessDenied")));
        assert!(!is_bucket_exists(Some("InvalidAccessKeyId")));
        assert!(!is_bucket_exists(Some("SignatureDoesNotMatch")));
        assert!(!is_bucket_exists(None));
    }

    #[test]
    fn object_url_tolerates_trailing_slash() {
        assert_eq!(
            object_url("http://minio:9000/", "memes", "dog.jpg"),
            "http://minio:9000/memes/dog.jpg"
        );
    }
}
