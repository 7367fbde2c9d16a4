//! S3 presigned-URL implementation of `LinkSigner`.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use super::LinkSigner;
use crate::error::BlobError;

/// S3-backed implementation of `LinkSigner`.
///
/// Image keys are object keys inside a single bucket. Presigning is a local
/// signing step and does not contact S3.
///
/// # Example
///
/// ```ignore
/// let client = create_s3_client(&sdk_config, None);
/// let signer = S3LinkSigner::new(client, "blog-api-s3-bucket");
/// let url = signer.presign_get("images/cover.png", Duration::from_secs(900)).await?;
/// ```
#[derive(Clone)]
pub struct S3LinkSigner {
    client: Client,
    bucket: String,
}

impl S3LinkSigner {
    /// Create a signer for the given bucket.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl LinkSigner for S3LinkSigner {
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, BlobError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| BlobError::InvalidExpiry(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| BlobError::Presign {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(request.uri().to_string())
    }
}

/// Create an S3 client from the shared SDK configuration.
///
/// Use a custom endpoint for S3-compatible services like MinIO or
/// LocalStack; those need path-style addressing.
pub fn create_s3_client(sdk_config: &SdkConfig, endpoint_url: Option<&str>) -> Client {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

    if let Some(endpoint) = endpoint_url {
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    Client::from_conf(builder.build())
}
