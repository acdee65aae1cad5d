use crate::config::Config;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use tracing;

// Creates the base SDK configuration for the S3-compatible storage backend.
// Credentials are the static MinIO root user/password from `Config`.
pub async fn create_sdk_config(config: &Config) -> SdkConfig {
    let endpoint_url = config.storage_base_url();
    tracing::info!(sdk_region = %config.minio_region, %endpoint_url, "Configuring object storage SDK");

    let credentials = Credentials::new(
        config.minio_root_user.clone(),
        config.minio_root_password.clone(),
        None,
        None,
        "memes-api-static",
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.minio_region.clone()))
        .endpoint_url(endpoint_url)
        .credentials_provider(credentials)
        .load()
        .await
}

// Creates an S3 client from a shared SdkConfig.
// Path-style addressing keeps URLs in the `<endpoint>/<bucket>/<key>` shape MinIO expects.
pub fn create_s3_client(sdk_config: &SdkConfig) -> S3Client {
    let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
        .force_path_style(true)
        .build();
    S3Client::from_conf(s3_config)
}
